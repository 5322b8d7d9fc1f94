use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::Story;

/// A single-slot memo of the last computed story list.
///
/// One slot is enough here: every request asks for the same configured
/// count, so the cache is not keyed by it. The mutex is held across the
/// whole check-recompute-store sequence, which collapses concurrent
/// misses into a single upstream fetch and keeps readers from ever seeing
/// a half-written entry.
pub struct StoryCache {
    slot: Mutex<Slot>,
    ttl: Duration,
}

struct Slot {
    stories: Vec<Story>,
    deadline: Option<Instant>,
}

impl StoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(Slot {
                stories: Vec::new(),
                deadline: None,
            }),
            ttl,
        }
    }

    /// Returns the cached list while it is fresh, otherwise recomputes it
    /// via `refresh` and stores the result. A failed refresh propagates
    /// the error and leaves the previous entry in place, so the next
    /// caller can still try again (or serve what was there before).
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<Vec<Story>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Story>>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(deadline) = slot.deadline {
            if Instant::now() < deadline {
                return Ok(slot.stories.clone());
            }
        }

        let stories = refresh().await?;
        slot.stories = stories.clone();
        slot.deadline = Some(Instant::now() + self.ttl);
        Ok(stories)
    }

    #[cfg(test)]
    async fn peek(&self) -> Vec<Story> {
        self.slot.lock().await.stories.clone()
    }
}

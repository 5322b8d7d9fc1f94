use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::hn_client::ItemSource;
use crate::models::Story;

/// Whether a resolved item counts toward the requested story total: it has
/// to be a story pointing at an external link. Comments, jobs, polls and
/// url-less self posts all fall through.
pub fn is_story_link(story: &Story) -> bool {
    story.item.kind == "story" && !story.item.url.is_empty()
}

/// Resolves every id concurrently and returns the outcomes in the order
/// the ids were given, one entry per id.
///
/// Each id gets its own task; a slow lookup only blocks its own task, and
/// a failed lookup leaves `None` at its position instead of failing the
/// batch. All tasks report into one channel tagged with their position,
/// and the results are re-sorted by that tag once the last task is done,
/// so the output order never depends on network arrival order.
pub async fn fetch_ordered(source: &Arc<dyn ItemSource>, ids: &[u64]) -> Vec<Option<Story>> {
    let (tx, mut rx) = mpsc::channel(ids.len().max(1));

    for (index, &id) in ids.iter().enumerate() {
        let source = Arc::clone(source);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = match source.item(id).await {
                Ok(item) => Some(Story::from_item(item)),
                Err(err) => {
                    debug!(id, error = %err, "item lookup failed, dropping it");
                    None
                }
            };
            // Only fails if the receiver went away, and it never does.
            let _ = tx.send((index, outcome)).await;
        });
    }
    drop(tx);

    let mut tagged = Vec::with_capacity(ids.len());
    while let Some(result) = rx.recv().await {
        tagged.push(result);
    }

    tagged.sort_by_key(|&(index, _)| index);
    tagged.into_iter().map(|(_, story)| story).collect()
}

/// Walks the ranked id listing in over-sized windows until `want`
/// qualifying stories have accumulated, preserving the listing order.
///
/// Every round asks for 25% more ids than the shortfall, since some share
/// of each window gets filtered out. The window end is clamped to the
/// listing length; an exhausted listing ends the loop with a short result
/// instead of running off the end.
pub async fn collect_top_stories(source: &Arc<dyn ItemSource>, want: usize) -> Result<Vec<Story>> {
    let ids = source
        .top_items()
        .await
        .map_err(AppError::UpstreamListing)?;

    let mut stories: Vec<Story> = Vec::with_capacity(want);
    let mut current = 0;
    while stories.len() < want && current < ids.len() {
        let need = ((want - stories.len()) * 5).div_ceil(4);
        let end = (current + need).min(ids.len());
        let window = &ids[current..end];
        current = end;

        let fetched = fetch_ordered(source, window).await;
        stories.extend(fetched.into_iter().flatten().filter(is_story_link));
    }

    if stories.len() < want {
        warn!(
            want,
            got = stories.len(),
            "top story listing ran out before the requested count"
        );
    }
    stories.truncate(want);
    Ok(stories)
}

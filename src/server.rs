use actix_web::{get, web, HttpResponse};
use chrono::DateTime;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::cache::StoryCache;
use crate::error::{AppError, Result};
use crate::hn_client::ItemSource;
use crate::models::Story;
use crate::stories::collect_top_stories;

/// Everything the handler needs, built once at startup and shared across
/// workers through `web::Data`.
pub struct AppState {
    pub source: Arc<dyn ItemSource>,
    pub cache: StoryCache,
    pub num_stories: usize,
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    count: Option<usize>,
}

#[get("/")]
pub async fn index(
    query: web::Query<IndexQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let start = Instant::now();

    let want = query.count.unwrap_or(state.num_stories);
    if want == 0 {
        return Err(AppError::BadRequest("count must be positive".to_string()));
    }

    let stories = state
        .cache
        .get_or_refresh(|| collect_top_stories(&state.source, want))
        .await?;

    let elapsed = start.elapsed();
    info!(
        want,
        got = stories.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "served top stories"
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&stories, elapsed)))
}

// Plain string assembly; the page is a single ranked list and does not
// warrant a template engine. Titles and authors are API-supplied text and
// get escaped, link urls go through attribute escaping.
fn render_page(stories: &[Story], elapsed: Duration) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Top Hacker News Links</title>\n</head>\n<body>\n\
         <h1>Top Hacker News Links</h1>\n<ol>\n",
    );

    for story in stories {
        let title = html_escape::encode_text(&story.item.title);
        let by = html_escape::encode_text(&story.item.by);
        let href = html_escape::encode_double_quoted_attribute(&story.item.url);
        let posted = DateTime::from_timestamp(story.item.time, 0)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        page.push_str(&format!(
            "  <li><a href=\"{}\">{}</a> <small>({})</small><br>\
             <small>{} points by {} on {}</small></li>\n",
            href, title, story.host, story.item.score, by, posted
        ));
    }

    page.push_str(&format!(
        "</ol>\n<p><small>Took {} ms to process.</small></p>\n</body>\n</html>\n",
        elapsed.as_millis()
    ));
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use actix_web::{http::StatusCode, test, App};
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct FixedSource {
        items: Vec<Item>,
        listing_fails: bool,
    }

    #[async_trait]
    impl ItemSource for FixedSource {
        async fn top_items(&self) -> anyhow::Result<Vec<u64>> {
            if self.listing_fails {
                return Err(anyhow!("listing unavailable"));
            }
            Ok(self.items.iter().map(|item| item.id).collect())
        }

        async fn item(&self, id: u64) -> anyhow::Result<Item> {
            self.items
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .ok_or_else(|| anyhow!("no such item {}", id))
        }
    }

    fn link_story(id: u64, title: &str, url: &str) -> Item {
        Item {
            id,
            kind: "story".to_string(),
            by: "tester".to_string(),
            title: title.to_string(),
            url: url.to_string(),
            score: 42,
            time: 1_700_000_000,
            descendants: 7,
        }
    }

    fn state_with(source: FixedSource) -> web::Data<AppState> {
        web::Data::new(AppState {
            source: Arc::new(source),
            cache: StoryCache::new(Duration::from_secs(10)),
            num_stories: 30,
        })
    }

    #[actix_web::test]
    async fn index_renders_the_fetched_stories() {
        let state = state_with(FixedSource {
            items: vec![
                link_story(1, "First story", "https://www.example.com/a"),
                link_story(2, "Second story", "https://blog.example.org/b"),
            ],
            listing_fails: false,
        });
        let app = test::init_service(App::new().app_data(state).service(index)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("First story"));
        assert!(body.contains("(example.com)"));
        assert!(body.contains("(blog.example.org)"));
        assert!(body.contains("Took"));
    }

    #[actix_web::test]
    async fn listing_failure_becomes_a_server_error() {
        let state = state_with(FixedSource {
            items: vec![],
            listing_fails: true,
        });
        let app = test::init_service(App::new().app_data(state).service(index)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn zero_count_is_rejected() {
        let state = state_with(FixedSource {
            items: vec![link_story(1, "A story", "https://example.com/a")],
            listing_fails: false,
        });
        let app = test::init_service(App::new().app_data(state).service(index)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/?count=0").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn count_limits_the_rendered_stories() {
        let state = state_with(FixedSource {
            items: vec![
                link_story(1, "First story", "https://example.com/1"),
                link_story(2, "Second story", "https://example.com/2"),
                link_story(3, "Third story", "https://example.com/3"),
            ],
            listing_fails: false,
        });
        let app = test::init_service(App::new().app_data(state).service(index)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/?count=2").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("First story"));
        assert!(body.contains("Second story"));
        assert!(!body.contains("Third story"));
    }

    #[::core::prelude::v1::test]
    fn titles_are_escaped_in_the_page() {
        let story = Story::from_item(link_story(
            1,
            "Tags <b>must</b> not pass",
            "https://example.com/a",
        ));
        let page = render_page(&[story], Duration::from_millis(3));
        assert!(page.contains("Tags &lt;b&gt;must&lt;/b&gt; not pass"));
        assert!(!page.contains("<b>must</b>"));
    }
}

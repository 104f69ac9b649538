use std::sync::LazyLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::models::Post;
use crate::parser;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const LIST_URL: &str = "https://gall.dcinside.com/board/lists/";
const MINOR_LIST_URL: &str = "https://gall.dcinside.com/mgallery/board/lists/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// The target site blocks aggressive clients, so both crawl phases pause
// between requests. Keep these even if the crawl feels slow.
const PAGE_DELAY: Duration = Duration::from_millis(500);
const BODY_DELAY: Duration = Duration::from_millis(300);

static GALLERY_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no gallery id in url: {0}")]
    InvalidUrl(String),
    #[error("list page request failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Pull the gallery id out of a gallery URL: the `id` query parameter
/// when present, otherwise the last non-empty path segment — accepted
/// only if it is slug-shaped, so arbitrary pages don't turn into bogus
/// gallery ids.
pub fn extract_gallery_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "id") {
        if !id.is_empty() {
            return Some(id.into_owned());
        }
    }
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    if GALLERY_ID_RE.is_match(segment) {
        Some(segment.to_string())
    } else {
        None
    }
}

/// Minor (user-created) galleries live under a separate path prefix.
pub fn is_minor_gallery(url: &str) -> bool {
    url.contains("mgallery")
}

pub struct GalleryClient {
    http: Client,
}

impl GalleryClient {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("https://gall.dcinside.com/"));
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Fetch and parse one list page. A failed listing is fatal for the
    /// crawl — unlike a single missing body, it means whole pages of
    /// posts are gone.
    pub async fn fetch_post_list(
        &self,
        gallery_id: &str,
        page: usize,
        minor: bool,
    ) -> Result<Vec<Post>, ScrapeError> {
        let list_url = if minor { MINOR_LIST_URL } else { LIST_URL };
        let html = self
            .http
            .get(list_url)
            .query(&[("id", gallery_id), ("page", &page.to_string())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parser::parse_list_page(&html))
    }

    /// Fetch one post body. Never fails outward: network errors, non-2xx
    /// statuses and missing content containers all degrade to an empty
    /// body, so one bad post can't abort the batch.
    pub async fn fetch_post_body(&self, post_url: &str) -> String {
        match self.try_fetch_body(post_url).await {
            Ok(body) => body,
            Err(e) => {
                debug!(url = %post_url, error = %e, "body fetch failed, keeping empty body");
                String::new()
            }
        }
    }

    async fn try_fetch_body(&self, post_url: &str) -> Result<String, ScrapeError> {
        let html = self
            .http
            .get(post_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parser::parse_post_body(&html).unwrap_or_default())
    }

    /// Crawl a gallery: list pages 1..=`pages`, then hydrate every stub's
    /// body. The two phases never interleave, and both are sequential
    /// with fixed pauses.
    pub async fn scrape_gallery(
        &self,
        url: &str,
        pages: usize,
    ) -> Result<Vec<Post>, ScrapeError> {
        let gallery_id =
            extract_gallery_id(url).ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;
        let minor = is_minor_gallery(url);
        info!(gallery = %gallery_id, minor, pages, "starting crawl");

        let mut posts = Vec::new();
        for page in 1..=pages {
            let listed = self.fetch_post_list(&gallery_id, page, minor).await?;
            debug!(page, count = listed.len(), "listed page");
            posts.extend(listed);
            tokio::time::sleep(PAGE_DELAY).await;
        }

        let pb = ProgressBar::new(posts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} posts")
                .unwrap()
                .progress_chars("=> "),
        );

        let mut hydrated = 0usize;
        for post in posts.iter_mut() {
            if !post.url.is_empty() {
                post.body = self.fetch_post_body(&post.url).await;
                if !post.body.is_empty() {
                    hydrated += 1;
                }
                tokio::time::sleep(BODY_DELAY).await;
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(total = posts.len(), hydrated, "crawl complete");
        Ok(posts)
    }
}

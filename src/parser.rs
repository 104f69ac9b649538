use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::Post;

/// Origin used to resolve relative post links from list pages.
pub const SITE_ORIGIN: &str = "https://gall.dcinside.com";

/// Numbering-cell markers for rows that are not posts.
const NON_POST_MARKERS: &[&str] = &["공지", "설문", "AD"];

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr.ub-content.us-post").unwrap());
static NUM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.gall_num").unwrap());
static TITLE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.gall_tit a").unwrap());
static WRITER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.gall_writer .nickname").unwrap());
static DATE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.gall_date").unwrap());
static BODY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.write_div").unwrap());

/// Parse a gallery list page into post stubs (empty bodies).
///
/// Announcement/poll/ad rows are skipped, as are rows without a usable
/// title anchor. Rows that don't match the expected structure simply
/// yield nothing; malformed HTML is never an error.
pub fn parse_list_page(html: &str) -> Vec<Post> {
    let document = Html::parse_document(html);
    let base = Url::parse(SITE_ORIGIN).ok();
    let mut posts = Vec::new();

    for row in document.select(&ROW_SEL) {
        if let Some(num) = row.select(&NUM_SEL).next() {
            let marker = element_text(&num);
            if NON_POST_MARKERS.contains(&marker.as_str()) {
                continue;
            }
        }

        // The title cell also carries a reply-count badge anchor; the
        // post link is the first anchor that isn't one.
        let Some(anchor) = row
            .select(&TITLE_LINK_SEL)
            .find(|a| !a.value().classes().any(|c| c == "reply_numbox"))
        else {
            continue;
        };

        let title = element_text(&anchor);
        let url = anchor
            .value()
            .attr("href")
            .map(|href| resolve_href(base.as_ref(), href))
            .unwrap_or_default();

        let writer = row
            .select(&WRITER_SEL)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_else(|| "익명".to_string());

        let date = row
            .select(&DATE_SEL)
            .next()
            .map(|el| {
                el.value()
                    .attr("title")
                    .map(str::to_string)
                    .unwrap_or_else(|| element_text(&el))
            })
            .unwrap_or_default();

        posts.push(Post {
            title,
            url,
            writer,
            date,
            body: String::new(),
        });
    }

    posts
}

/// Extract the post body from a detail page: the `write_div` container's
/// text, one line per block-level text run, trimmed. `None` when the
/// container is missing.
pub fn parse_post_body(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = document.select(&BODY_SEL).next()?;
    let body = container
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Some(body)
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(resolved) => resolved.to_string(),
        None => href.to_string(),
    }
}

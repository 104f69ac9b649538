use crate::models::{Post, ScoredPost};

use super::lexicon::Lexicon;

/// Score one post against the lexicon.
///
/// Title and body are joined with a single space and lowercased; every
/// keyword occurrence appends one entry to `matched_keywords`, so the
/// score always equals the matched-keyword count. `body_preview` is left
/// empty here; the aggregator fills it for surviving posts.
pub fn score_post(post: &Post, lexicon: &Lexicon) -> ScoredPost {
    let text = format!("{} {}", post.title, post.body).to_lowercase();

    let mut matched = Vec::new();
    for keyword in lexicon.keywords() {
        let count = count_occurrences(&text, keyword);
        matched.extend(std::iter::repeat(keyword.clone()).take(count));
    }

    ScoredPost {
        post: post.clone(),
        negative_score: matched.len(),
        matched_keywords: matched,
        body_preview: String::new(),
    }
}

/// Count substring occurrences, overlapping ones included: the scan
/// advances one character past each match start, so "ㅋㅋㅋ" contains
/// "ㅋㅋ" twice.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        let hit = start + pos;
        let step = haystack[hit..].chars().next().map_or(1, char::len_utf8);
        start = hit + step;
    }
    count
}

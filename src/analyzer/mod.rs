pub mod lexicon;
pub mod score;

use std::collections::{BTreeMap, HashMap};

use crate::models::{AnalysisSummary, Post, ScoredPost};
use lexicon::{Lexicon, OTHER_CATEGORY};

/// Minimum keyword-occurrence score for a post to count as negative.
pub const DEFAULT_THRESHOLD: usize = 2;

/// How many of the most frequent keywords feed the summary. The category
/// tally runs over these entries only, not over all matched keywords.
const TOP_KEYWORD_LIMIT: usize = 15;

const PREVIEW_CHARS: usize = 200;

/// Score a batch of posts and build the ranked summary.
pub fn analyze_posts(posts: &[Post], threshold: usize, lexicon: &Lexicon) -> AnalysisSummary {
    let mut negative: Vec<ScoredPost> = posts
        .iter()
        .map(|p| score::score_post(p, lexicon))
        .filter(|p| p.negative_score >= threshold)
        .collect();

    // Stable: equal scores keep crawl order.
    negative.sort_by(|a, b| b.negative_score.cmp(&a.negative_score));

    let top_keywords = rank_keywords(&negative);

    let mut category_summary: BTreeMap<String, usize> = BTreeMap::new();
    for (keyword, count) in &top_keywords {
        let category = lexicon.category_of(keyword).unwrap_or(OTHER_CATEGORY);
        *category_summary.entry(category.to_string()).or_insert(0) += count;
    }

    for post in &mut negative {
        post.body_preview = preview(&post.post.body);
    }

    let total = posts.len();
    let negative_count = negative.len();
    let negative_ratio = if total > 0 {
        (negative_count as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    AnalysisSummary {
        total,
        negative_count,
        negative_ratio,
        top_keywords,
        category_summary,
        negative_posts: negative,
    }
}

/// Frequency-count the matched keywords of all surviving posts and keep
/// the top entries. Ties break by first appearance in the flattened
/// sequence (count map + order list, then a stable sort), never by hash
/// order.
fn rank_keywords(negative: &[ScoredPost]) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in negative {
        for keyword in &post.matched_keywords {
            if !counts.contains_key(keyword.as_str()) {
                order.push(keyword);
            }
            *counts.entry(keyword).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|kw| (kw.to_string(), counts[kw]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_KEYWORD_LIMIT);
    ranked
}

fn preview(body: &str) -> String {
    if body.chars().count() <= PREVIEW_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: &str) -> Post {
        Post {
            title: title.to_string(),
            body: body.to_string(),
            ..Post::default()
        }
    }

    fn sample_posts() -> Vec<Post> {
        vec![
            post("좋아요 최고", "재밌다"),
            post("이 제품 쓰레기 최악", ""),
            post("쓰레기 쓰레기 쓰레기", "최악 최악"),
            post("별로", ""),
        ]
    }

    #[test]
    fn empty_input() {
        let lex = Lexicon::build();
        let summary = analyze_posts(&[], DEFAULT_THRESHOLD, &lex);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.negative_count, 0);
        assert_eq!(summary.negative_ratio, 0.0);
        assert!(summary.top_keywords.is_empty());
        assert!(summary.category_summary.is_empty());
        assert!(summary.negative_posts.is_empty());
    }

    #[test]
    fn threshold_filters_and_ratio_rounds() {
        let lex = Lexicon::build();
        let summary = analyze_posts(&sample_posts(), DEFAULT_THRESHOLD, &lex);
        // Scores: 0, 2, 5, 1 → two posts at threshold 2.
        assert_eq!(summary.total, 4);
        assert_eq!(summary.negative_count, 2);
        assert_eq!(summary.negative_ratio, 50.0);
        assert!(summary.negative_count <= summary.total);
    }

    #[test]
    fn ratio_rounds_to_one_decimal() {
        let lex = Lexicon::build();
        let mut posts = vec![post("쓰레기 최악", "")];
        posts.extend(std::iter::repeat(post("무난", "")).take(2));
        let summary = analyze_posts(&posts, DEFAULT_THRESHOLD, &lex);
        // 1/3 → 33.3, not 33.33333.
        assert_eq!(summary.negative_ratio, 33.3);
    }

    #[test]
    fn negative_count_monotone_in_threshold() {
        let lex = Lexicon::build();
        let posts = sample_posts();
        let mut previous = usize::MAX;
        for threshold in 0..5 {
            let count = analyze_posts(&posts, threshold, &lex).negative_count;
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn threshold_zero_admits_score_zero() {
        let lex = Lexicon::build();
        let summary = analyze_posts(&[post("좋아요", "")], 0, &lex);
        assert_eq!(summary.negative_count, 1);
        let summary = analyze_posts(&[post("좋아요", "")], DEFAULT_THRESHOLD, &lex);
        assert_eq!(summary.negative_count, 0);
    }

    #[test]
    fn posts_sorted_by_score_descending_and_stable() {
        let lex = Lexicon::build();
        let posts = vec![
            post("첫번째 쓰레기 최악", ""),
            post("쓰레기 쓰레기 쓰레기", ""),
            post("두번째 쓰레기 최악", ""),
        ];
        let summary = analyze_posts(&posts, DEFAULT_THRESHOLD, &lex);
        let scores: Vec<usize> = summary
            .negative_posts
            .iter()
            .map(|p| p.negative_score)
            .collect();
        assert_eq!(scores, vec![3, 2, 2]);
        // The two score-2 posts keep their original relative order.
        assert!(summary.negative_posts[1].post.title.starts_with("첫번째"));
        assert!(summary.negative_posts[2].post.title.starts_with("두번째"));
    }

    #[test]
    fn category_summary_matches_top_keyword_counts() {
        let lex = Lexicon::build();
        let summary = analyze_posts(&sample_posts(), DEFAULT_THRESHOLD, &lex);
        let keyword_total: usize = summary.top_keywords.iter().map(|(_, c)| c).sum();
        let category_total: usize = summary.category_summary.values().sum();
        assert_eq!(keyword_total, category_total);
        assert!(summary.top_keywords.len() <= 15);
    }

    #[test]
    fn keyword_ties_keep_first_encounter_order() {
        let lex = Lexicon::from_table(&[("test", &["aa", "bb", "cc"])]);
        let posts = vec![post("bb aa", ""), post("cc aa", "")];
        let summary = analyze_posts(&posts, DEFAULT_THRESHOLD, &lex);
        // aa: 2, then bb and cc tied at 1 in flattened order. Note the
        // flattened order follows lexicon order within each post, so aa
        // is encountered before bb.
        let keywords: Vec<&str> = summary
            .top_keywords
            .iter()
            .map(|(kw, _)| kw.as_str())
            .collect();
        assert_eq!(keywords, vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn top_keywords_capped_at_fifteen() {
        let words: Vec<String> = (0..20).map(|i| format!("kw{:02}", i)).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let lex = Lexicon::from_table(&[("test", &refs[..])]);
        let title = words.join(" ");
        let summary = analyze_posts(&[post(&title, "")], DEFAULT_THRESHOLD, &lex);
        assert_eq!(summary.top_keywords.len(), 15);
    }

    #[test]
    fn builtin_lexicon_never_tallies_other_category() {
        // Every matched keyword comes from the lexicon, so the fallback
        // category can only appear with a lexicon/tally mismatch.
        let lex = Lexicon::build();
        let summary = analyze_posts(&sample_posts(), DEFAULT_THRESHOLD, &lex);
        assert!(!summary.category_summary.contains_key(OTHER_CATEGORY));
    }

    #[test]
    fn long_body_gets_ellipsis_preview() {
        let lex = Lexicon::build();
        let body: String = std::iter::repeat('가').take(250).collect();
        let summary = analyze_posts(&[post("쓰레기 최악", &body)], DEFAULT_THRESHOLD, &lex);
        let p = &summary.negative_posts[0];
        assert_eq!(p.body_preview.chars().count(), 203);
        assert!(p.body_preview.ends_with("..."));
    }

    #[test]
    fn short_body_preview_unchanged() {
        let lex = Lexicon::build();
        let summary =
            analyze_posts(&[post("쓰레기 최악", "짧은 본문")], DEFAULT_THRESHOLD, &lex);
        assert_eq!(summary.negative_posts[0].body_preview, "짧은 본문");
    }
}

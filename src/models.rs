use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One gallery post. Created by the list parser with an empty `body`,
/// hydrated in place by the body fetcher. Identity is the detail URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub url: String,
    pub writer: String,
    pub date: String,
    pub body: String,
}

/// A post plus its negativity scoring.
///
/// `matched_keywords` holds one entry per occurrence, in lexicon order.
/// `body_preview` is filled only for posts that survive the threshold
/// filter (at most 200 chars plus an ellipsis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub post: Post,
    pub negative_score: usize,
    pub matched_keywords: Vec<String>,
    pub body_preview: String,
}

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub negative_count: usize,
    /// Percentage of negative posts, rounded to one decimal. 0 when
    /// `total` is 0.
    pub negative_ratio: f64,
    /// At most 15 (keyword, occurrence count) pairs, descending count.
    pub top_keywords: Vec<(String, usize)>,
    /// Category totals over the `top_keywords` entries only.
    pub category_summary: BTreeMap<String, usize>,
    /// Surviving posts, descending score; equal scores keep crawl order.
    pub negative_posts: Vec<ScoredPost>,
}

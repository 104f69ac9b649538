use std::collections::HashMap;

/// Category assigned to keywords the table does not cover.
pub const OTHER_CATEGORY: &str = "기타";

/// Negative keyword table, grouped by category. Matching is
/// case-insensitive substring matching, so entries include common
/// abbreviated/jamo variants alongside the full forms.
///
/// 최악 and 불쾌 appear under both 비판 and 혐오; `Lexicon::from_table`
/// keeps one keyword entry (first position) and lets the later category
/// win, so both resolve to 혐오.
const NEGATIVE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "욕설",
        &[
            "시발", "씨발", "ㅅㅂ", "시바", "씨바", "개새끼", "ㄱㅅㄲ",
            "병신", "ㅂㅅ", "지랄", "ㅈㄹ", "꺼져", "닥쳐",
            "미친", "ㅁㅊ", "좆", "ㅈ같", "존나", "ㅈㄴ",
            "새끼", "ㅅㄲ", "멍청", "바보", "등신", "찐따",
        ],
    ),
    (
        "비판",
        &[
            "쓰레기", "최악", "실망", "별로", "짜증", "화남", "싫다",
            "싫어", "후회", "망했", "노답", "답없", "답이없",
            "구리다", "구림", "별로임", "개판", "엉망", "형편없",
            "불만", "불쾌", "짜증남", "짜증나", "열받", "빡침",
            "빡치", "어이없", "한심", "못한다", "못함", "무능",
            "거지같", "쓸모없", "폐급", "하자", "결함", "고장",
        ],
    ),
    (
        "혐오",
        &[
            "혐오", "역겹", "구역질", "토나", "꼴불견", "더럽",
            "추하", "징그럽", "소름", "끔찍", "최악",
            "불쾌", "메스껍", "욕나오", "치떨",
        ],
    ),
];

/// The keyword table in matchable form: an ordered, deduplicated keyword
/// list plus a keyword→category map. Built once at startup and passed by
/// reference into scoring and aggregation.
#[derive(Debug, Clone)]
pub struct Lexicon {
    keywords: Vec<String>,
    categories: HashMap<String, String>,
}

impl Lexicon {
    /// Build from the built-in table.
    pub fn build() -> Self {
        Self::from_table(NEGATIVE_KEYWORDS)
    }

    /// Build from an arbitrary category→keywords table. Keywords are
    /// lowercased; a keyword listed under several categories keeps its
    /// first position in the ordered list while the last category wins.
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        let mut keywords = Vec::new();
        let mut categories = HashMap::new();
        for (category, words) in table {
            for word in *words {
                let word = word.to_lowercase();
                if !categories.contains_key(&word) {
                    keywords.push(word.clone());
                }
                categories.insert(word, (*category).to_string());
            }
        }
        Self { keywords, categories }
    }

    /// All keywords in construction order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn category_of(&self, keyword: &str) -> Option<&str> {
        self.categories.get(keyword).map(String::as_str)
    }

    /// Category names in table order, each with its keyword count.
    pub fn category_sizes(&self) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for kw in &self.keywords {
            let cat = self.categories[kw].as_str();
            if !counts.contains_key(cat) {
                order.push(cat.to_string());
            }
            *counts.entry(cat).or_insert(0) += 1;
        }
        order
            .into_iter()
            .map(|cat| {
                let n = counts[cat.as_str()];
                (cat, n)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_deduplicated() {
        let lex = Lexicon::build();
        let mut seen = std::collections::HashSet::new();
        for kw in lex.keywords() {
            assert!(seen.insert(kw.clone()), "duplicate keyword: {}", kw);
        }
    }

    #[test]
    fn duplicate_keyword_takes_last_category() {
        let lex = Lexicon::build();
        assert_eq!(lex.category_of("최악"), Some("혐오"));
        assert_eq!(lex.category_of("불쾌"), Some("혐오"));
    }

    #[test]
    fn construction_order_is_table_order() {
        let lex = Lexicon::from_table(&[
            ("a", &["x", "y"]),
            ("b", &["z", "y"]),
        ]);
        assert_eq!(lex.keywords(), &["x", "y", "z"]);
        assert_eq!(lex.category_of("y"), Some("b"));
    }

    #[test]
    fn unknown_keyword_has_no_category() {
        let lex = Lexicon::build();
        assert_eq!(lex.category_of("좋아요"), None);
    }
}

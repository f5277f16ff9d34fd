// src/classify.rs
//! Keyword classifier: maps a free-text chat message to at most one category.
//!
//! The message is normalized (all whitespace removed, ASCII lowercased; Hangul and
//! other scripts pass through unchanged) and the ordered rule list is walked. The
//! first rule whose keyword occurs in the normalized message wins, so overlaps
//! between categories are settled purely by list order.

use crate::category::Category;
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Ordered (keyword, category) pair. The keyword is stored normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: Category,
}

impl KeywordRule {
    pub fn new(keyword: &str, category: Category) -> Self {
        Self {
            keyword: normalize_message(keyword),
            category,
        }
    }
}

/// Bump when the built-in table below changes order or content.
pub const DEFAULT_RULES_VERSION: u32 = 1;

/// Built-in priority table, highest priority first.
///
/// Narrow topics come before broad ones: a message mentioning both 청약 and 대출
/// is about subscriptions, and one mentioning 재건축 and 규제 is about the project.
/// Policy/market words are the broadest and go last.
pub const DEFAULT_RULE_TABLE: &[(Category, &[&str])] = &[
    (
        Category::PreSale,
        &["분양", "청약", "모델하우스", "당첨", "미분양", "presale"],
    ),
    (
        Category::Development,
        &[
            "재건축",
            "재개발",
            "정비사업",
            "리모델링",
            "신도시",
            "gtx",
            "개발",
        ],
    ),
    (
        Category::Finance,
        &[
            "대출", "금리", "금융", "주담대", "dsr", "ltv", "모기지", "mortgage",
        ],
    ),
    (
        Category::Tax,
        &[
            "세금", "양도세", "종부세", "취득세", "보유세", "세제", "법률", "규제", "tax",
        ],
    ),
    (
        Category::Policy,
        &["정책", "제도", "대책", "정부", "국토부", "policy"],
    ),
    (
        Category::Market,
        &[
            "시장", "시황", "동향", "시세", "집값", "매매", "전세", "거래량", "market",
        ],
    ),
];

/// Remove every whitespace char and fold ASCII case.
pub fn normalize_message(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<KeywordRule>,
}

impl Classifier {
    /// Build from an ordered rule list. Rejects empty keywords and a keyword
    /// claimed by two different categories (the later one could never fire).
    pub fn new(rules: Vec<KeywordRule>) -> Result<Self> {
        let mut seen: HashMap<&str, Category> = HashMap::new();
        for (idx, r) in rules.iter().enumerate() {
            if r.keyword.is_empty() {
                bail!("keyword rule #{idx} has an empty keyword");
            }
            if let Some(prev) = seen.insert(r.keyword.as_str(), r.category) {
                if prev != r.category {
                    bail!(
                        "keyword `{}` maps to both `{}` and `{}`",
                        r.keyword,
                        prev,
                        r.category
                    );
                }
            }
        }
        Ok(Self { rules })
    }

    /// Expand grouped `(category, keywords)` entries in order.
    pub fn from_groups<'a, I, K>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator<Item = &'a str>,
    {
        let rules = groups
            .into_iter()
            .flat_map(|(cat, kws)| kws.into_iter().map(move |k| KeywordRule::new(k, cat)))
            .collect();
        Self::new(rules)
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn classify(&self, message: &str) -> Option<Category> {
        self.classify_with_rule(message).map(|r| r.category)
    }

    /// Same as [`classify`](Self::classify) but returns the winning rule.
    pub fn classify_with_rule(&self, message: &str) -> Option<&KeywordRule> {
        let text = normalize_message(message);
        if text.is_empty() {
            return None;
        }
        self.rules.iter().find(|r| text.contains(r.keyword.as_str()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        let rules = DEFAULT_RULE_TABLE
            .iter()
            .flat_map(|(cat, kws)| kws.iter().map(move |k| KeywordRule::new(k, *cat)))
            .collect();
        // Built-in table has no conflicts; checked by `default_table_is_valid`.
        Self { rules }
    }
}

// src/category.rs
//! Canonical news categories: label, display glyph and the short keyword shown in
//! the category menu.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six fixed topic labels records are tagged with upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Policy,
    Market,
    PreSale,
    Development,
    Finance,
    Tax,
}

impl Category {
    /// Menu order. Also the order used for quick replies.
    pub const ALL: [Category; 6] = [
        Category::Policy,
        Category::Market,
        Category::PreSale,
        Category::Development,
        Category::Finance,
        Category::Tax,
    ];

    /// Canonical label, exactly as stored in the `category` column.
    pub fn label(self) -> &'static str {
        match self {
            Category::Policy => "정책·제도",
            Category::Market => "시장 동향·시황",
            Category::PreSale => "분양·청약",
            Category::Development => "개발·재건축·재개발",
            Category::Finance => "금융·대출·금리",
            Category::Tax => "세금·법률·규제",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Category::Policy => "📋",
            Category::Market => "📈",
            Category::PreSale => "🏠",
            Category::Development => "🏗️",
            Category::Finance => "💰",
            Category::Tax => "⚖️",
        }
    }

    /// Short keyword suggested to the user; classifies back to this category.
    pub fn menu_keyword(self) -> &'static str {
        match self {
            Category::Policy => "정책",
            Category::Market => "시장",
            Category::PreSale => "분양",
            Category::Development => "재건축",
            Category::Finance => "대출",
            Category::Tax => "세금",
        }
    }

    /// Resolve a stored label: trimmed, case-insensitive, exact.
    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
    }

    /// True when a record's raw category field names this category.
    pub fn matches_field(self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.label().to_lowercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Category::from_label(&value).ok_or_else(|| format!("unknown category `{value}`"))
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_label(c.label()), Some(c));
        }
    }

    #[test]
    fn from_label_trims_and_rejects_partial() {
        assert_eq!(Category::from_label("  분양·청약 "), Some(Category::PreSale));
        assert_eq!(Category::from_label("분양"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn matches_field_is_exact_after_trim() {
        assert!(Category::Tax.matches_field("세금·법률·규제\n"));
        assert!(!Category::Tax.matches_field("세금"));
        assert!(!Category::Tax.matches_field("세금·법률·규제 기타"));
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Category::Market).unwrap();
        assert_eq!(json, "\"시장 동향·시황\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Market);
        assert!(serde_json::from_str::<Category>("\"sports\"").is_err());
    }
}

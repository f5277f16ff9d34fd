// src/format.rs
//! Renders a ranked record list into the chat reply text.

use crate::category::Category;
use crate::record::NewsRecord;
use std::fmt::Write as _;

pub const GENERIC_GLYPH: &str = "📰";
pub const NO_TITLE: &str = "제목 없음";
pub const NO_URL: &str = "(URL 정보 없음)";

/// Header line: category-scoped or the generic "today's news".
pub fn header(count: usize, category: Option<Category>) -> String {
    match category {
        Some(c) => format!("{} {} 뉴스 (총 {}건)", c.glyph(), c.label(), count),
        None => format!("{GENERIC_GLYPH} 오늘의 부동산 뉴스 (총 {count}건)"),
    }
}

/// Static hint listing the menu keyword of every category.
pub fn category_menu_hint() -> String {
    let keywords = Category::ALL
        .iter()
        .map(|c| c.menu_keyword())
        .collect::<Vec<_>>()
        .join(" · ");
    format!("💡 카테고리별 뉴스: {keywords}\n원하는 키워드를 입력해 보세요.")
}

/// Numbered title/link pairs under a header. An empty list yields the header only.
pub fn format_news(records: &[NewsRecord], category: Option<Category>) -> String {
    let mut out = header(records.len(), category);
    if records.is_empty() {
        return out;
    }

    for (idx, r) in records.iter().enumerate() {
        let title = if r.title.trim().is_empty() {
            NO_TITLE
        } else {
            r.title.as_str()
        };
        let link = r.resolved_link().unwrap_or(NO_URL);
        let _ = write!(out, "\n\n{}. {}\n{}", idx + 1, title, link);
    }

    if category.is_none() {
        out.push_str("\n\n");
        out.push_str(&category_menu_hint());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, url: Option<&str>) -> NewsRecord {
        NewsRecord {
            title: title.into(),
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn latest_layout_with_menu_hint() {
        let out = format_news(
            &[rec("첫 기사", Some("https://a")), rec("둘째", Some("https://b"))],
            None,
        );
        let expected = format!(
            "📰 오늘의 부동산 뉴스 (총 2건)\n\n1. 첫 기사\nhttps://a\n\n2. 둘째\nhttps://b\n\n{}",
            category_menu_hint()
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn category_layout_has_glyph_and_no_hint() {
        let out = format_news(&[rec("분양 소식", Some("https://x"))], Some(Category::PreSale));
        assert_eq!(out, "🏠 분양·청약 뉴스 (총 1건)\n\n1. 분양 소식\nhttps://x");
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(format_news(&[], None), "📰 오늘의 부동산 뉴스 (총 0건)");
        assert_eq!(
            format_news(&[], Some(Category::Tax)),
            "⚖️ 세금·법률·규제 뉴스 (총 0건)"
        );
    }

    #[test]
    fn placeholders_for_missing_title_and_link() {
        let out = format_news(&[rec("  ", None), rec("제목 있음", None)], Some(Category::Finance));
        assert!(out.contains(&format!("1. {NO_TITLE}\n{NO_URL}")));
        assert!(out.contains(&format!("2. 제목 있음\n{NO_URL}")));
    }

    #[test]
    fn alternate_link_fields_are_used() {
        let r = NewsRecord {
            title: "t".into(),
            originallink: Some("https://orig".into()),
            ..Default::default()
        };
        assert!(format_news(&[r], Some(Category::Market)).ends_with("1. t\nhttps://orig"));
    }

    #[test]
    fn hint_lists_every_menu_keyword() {
        let hint = category_menu_hint();
        for c in Category::ALL {
            assert!(hint.contains(c.menu_keyword()));
        }
    }

    #[test]
    fn formatting_is_idempotent() {
        let recs = vec![rec("a", Some("u")), rec("", None)];
        assert_eq!(format_news(&recs, None), format_news(&recs, None));
    }
}

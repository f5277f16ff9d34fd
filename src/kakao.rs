// src/kakao.rs
//! KakaoTalk skill payloads (request envelope in, skill template v2.0 out).
//!
//! Only `userRequest.user.id` and `userRequest.utterance` are read; the other
//! blocks are accepted as opaque JSON so platform additions never break parsing.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kakao rejects simpleText bodies longer than this (in chars).
pub const SIMPLE_TEXT_MAX_CHARS: usize = 1000;

pub const MSG_NOT_READY: &str = "최신 뉴스를 준비 중입니다. 잠시 후 다시 시도해주세요.";
pub const MSG_FAILURE: &str = "뉴스를 불러오는 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    #[serde(default)]
    pub user_request: UserRequest,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub bot: Option<Value>,
    #[serde(default)]
    pub contexts: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub utterance: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub block: Option<Value>,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: Option<Value>,
}

impl SkillRequest {
    pub fn utterance(&self) -> &str {
        self.user_request.utterance.as_deref().unwrap_or("")
    }

    pub fn user_id(&self) -> &str {
        &self.user_request.user.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub template: SkillTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTemplate {
    pub outputs: Vec<Output>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub simple_text: SimpleText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub label: String,
    pub action: String,
    pub message_text: String,
}

impl QuickReply {
    pub fn message(label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: "message".to_string(),
            message_text: label.to_string(),
        }
    }
}

impl SkillResponse {
    /// Single simpleText bubble, clipped to the platform limit.
    pub fn simple_text(text: &str) -> Self {
        Self {
            version: "2.0".to_string(),
            template: SkillTemplate {
                outputs: vec![Output {
                    simple_text: SimpleText {
                        text: clip_chars(text.trim(), SIMPLE_TEXT_MAX_CHARS),
                    },
                }],
                quick_replies: Vec::new(),
            },
        }
    }

    /// Attach one quick reply per category menu keyword.
    pub fn with_category_menu(mut self) -> Self {
        self.template.quick_replies = Category::ALL
            .iter()
            .map(|c| QuickReply::message(c.menu_keyword()))
            .collect();
        self
    }

    pub fn text(&self) -> &str {
        self.template
            .outputs
            .first()
            .map(|o| o.simple_text.text.as_str())
            .unwrap_or("")
    }
}

/// "No news yet" text for an empty selection.
pub fn empty_result_message(category: Option<Category>) -> String {
    match category {
        Some(c) => format!(
            "아직 {} 관련 뉴스가 없습니다. 잠시 후 다시 시도해주세요.",
            c.label()
        ),
        None => MSG_NOT_READY.to_string(),
    }
}

/// Marker appended when a reply is cut at an item boundary.
const CLIP_MARK: &str = "\n\n…";

/// Truncate to at most `max` chars. The cut goes after the last complete
/// `\n\n`-separated block that fits, so no title or link is split; text
/// without such a boundary is cut on a char boundary. Either way it ends in `…`.
pub fn clip_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let budget = max.saturating_sub(CLIP_MARK.chars().count());
    let head: String = s.chars().take(budget).collect();
    if let Some(idx) = head.rfind("\n\n").filter(|&i| i > 0) {
        let mut out = head[..idx].to_string();
        out.push_str(CLIP_MARK);
        return out;
    }

    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_and_full_requests() {
        let minimal: SkillRequest =
            serde_json::from_value(json!({"userRequest": {"user": {"id": "u1"}}})).unwrap();
        assert_eq!(minimal.user_id(), "u1");
        assert_eq!(minimal.utterance(), "");

        let full: SkillRequest = serde_json::from_value(json!({
            "intent": {"id": "x"},
            "userRequest": {
                "timezone": "Asia/Seoul",
                "user": {"id": "u2", "type": "botUserKey", "properties": {}},
                "utterance": "분양 뉴스",
                "params": {"ignoreMe": "true"},
                "block": {"id": "b", "name": "news"},
                "lang": "ko"
            },
            "bot": {"id": "bot", "name": "오백냥"},
            "action": {"name": "news", "params": {}, "detailParams": {}, "clientExtra": {}, "id": "a"},
            "contexts": []
        }))
        .unwrap();
        assert_eq!(full.utterance(), "분양 뉴스");
        assert_eq!(full.user_request.lang.as_deref(), Some("ko"));
    }

    #[test]
    fn response_shape_matches_skill_v2() {
        let v = serde_json::to_value(SkillResponse::simple_text("hi").with_category_menu()).unwrap();
        assert_eq!(v["version"], "2.0");
        assert_eq!(v["template"]["outputs"][0]["simpleText"]["text"], "hi");
        let qr = v["template"]["quickReplies"].as_array().unwrap();
        assert_eq!(qr.len(), 6);
        assert_eq!(qr[0]["action"], "message");
        assert_eq!(qr[0]["label"], qr[0]["messageText"]);
    }

    #[test]
    fn quick_replies_omitted_when_empty() {
        let v = serde_json::to_value(SkillResponse::simple_text("x")).unwrap();
        assert!(v["template"].get("quickReplies").is_none());
    }

    #[test]
    fn clip_respects_char_boundaries() {
        let long = "가".repeat(1200);
        let out = clip_chars(&long, SIMPLE_TEXT_MAX_CHARS);
        assert_eq!(out.chars().count(), SIMPLE_TEXT_MAX_CHARS);
        assert!(out.ends_with('…'));
        assert_eq!(clip_chars("짧은 글", 10), "짧은 글");
    }

    #[test]
    fn clip_keeps_whole_items_with_long_links() {
        let mut text = String::from("📰 오늘의 부동산 뉴스 (총 5건)");
        let links: Vec<String> = (1..=5)
            .map(|i| format!("https://news.example.kr/{}/{i}", "a".repeat(280)))
            .collect();
        for (i, link) in links.iter().enumerate() {
            text.push_str(&format!("\n\n{}. 기사 제목 {}\n{link}", i + 1, i + 1));
        }
        assert!(text.chars().count() > SIMPLE_TEXT_MAX_CHARS);

        let out = clip_chars(&text, SIMPLE_TEXT_MAX_CHARS);
        assert!(out.chars().count() <= SIMPLE_TEXT_MAX_CHARS);
        assert!(out.ends_with("\n\n…"));
        assert!(text.starts_with(out.trim_end_matches('…').trim_end()));
        for line in out.lines().filter(|l| l.starts_with("https://")) {
            assert!(links.iter().any(|l| l == line), "split link: {line}");
        }
        assert!(out.contains(&links[0]));
        assert!(!out.contains(&links[4]));
    }

    #[test]
    fn reply_bubble_is_clipped_at_item_boundary() {
        let body = format!("header\n\n1. a\n{}", "x".repeat(1200));
        let resp = SkillResponse::simple_text(&body);
        assert_eq!(resp.text(), "header\n\n…");
    }

    #[test]
    fn empty_messages_name_the_category() {
        assert_eq!(empty_result_message(None), MSG_NOT_READY);
        assert!(empty_result_message(Some(Category::PreSale)).contains("분양·청약"));
    }
}

//! Slack附件消息体
//!
//! 构建发送到 `services/hooks/jenkins-ci` 的JSON负载

use serde::Serialize;

/// 默认颜色
pub const DEFAULT_COLOR: &str = "warning";

/// 附件中启用markdown的字段
const MRKDWN_IN: [&str; 3] = ["pretext", "text", "fields"];

/// 顶层消息体
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlackPayload<'a> {
    pub channel: &'a str,
    pub attachments: Vec<Attachment<'a>>,
    pub link_names: &'static str,
}

/// 附件
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attachment<'a> {
    pub fallback: &'a str,
    pub color: &'a str,
    pub fields: Vec<AttachmentField<'a>>,
    pub mrkdwn_in: [&'static str; 3],
}

/// 附件字段
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttachmentField<'a> {
    pub short: bool,
    pub value: &'a str,
}

impl<'a> SlackPayload<'a> {
    /// 为单个房间构建消息体
    pub fn new(channel: &'a str, message: &'a str, color: &'a str) -> Self {
        Self {
            channel,
            attachments: vec![Attachment {
                fallback: message,
                color,
                fields: vec![AttachmentField {
                    short: false,
                    value: message,
                }],
                mrkdwn_in: MRKDWN_IN,
            }],
            link_names: "1",
        }
    }

    /// 序列化为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let payload = SlackPayload::new("#ci", "Build failed", "danger");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "channel": "#ci",
                "link_names": "1",
                "attachments": [{
                    "fallback": "Build failed",
                    "color": "danger",
                    "fields": [{"short": false, "value": "Build failed"}],
                    "mrkdwn_in": ["pretext", "text", "fields"]
                }]
            })
        );
    }

    #[test]
    fn test_payload_preserves_unicode_and_markdown() {
        let message = "构建失败 *main* <@here> ✅";
        let json = SlackPayload::new("#构建", message, DEFAULT_COLOR)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["channel"], "#构建");
        assert_eq!(value["attachments"][0]["fallback"], message);
        assert_eq!(value["attachments"][0]["color"], "warning");
    }
}

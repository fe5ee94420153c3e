use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::jid::Jid;

/// Absent and `null` fields both decode as `None` and are reported as missing.
#[derive(Deserialize)]
pub struct SendMessagePayload {
    #[serde(default)]
    pub group_jid: Option<String>,
    #[serde(default)]
    pub recipient_jid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

impl SendMessagePayload {
    /// Checks required fields, then parses the group and recipient JIDs in that order.
    pub fn validate(self) -> Result<SendRequest, DispatchError> {
        let (Some(group), Some(recipient), Some(text)) = (
            present(self.group_jid),
            present(self.recipient_jid),
            present(self.message),
        ) else {
            return Err(DispatchError::MissingField);
        };

        let group = group
            .parse()
            .map_err(DispatchError::InvalidGroupIdentifier)?;
        let recipient = recipient
            .parse()
            .map_err(DispatchError::InvalidRecipientIdentifier)?;

        Ok(SendRequest {
            group,
            recipient,
            text,
        })
    }
}

#[derive(Debug)]
pub struct SendRequest {
    pub group: Jid,
    pub recipient: Jid,
    pub text: String,
}

/// Text plus the JIDs a client should render as @mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub mentioned_jids: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(group: &str, recipient: &str, message: &str) -> SendMessagePayload {
        SendMessagePayload {
            group_jid: Some(group.to_string()),
            recipient_jid: Some(recipient.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn missing_keys_decode_as_empty() {
        let p: SendMessagePayload = serde_json::from_str(r#"{"group_jid":"1@g.us"}"#).unwrap();
        assert!(matches!(p.validate(), Err(DispatchError::MissingField)));
    }

    #[test]
    fn null_fields_are_missing() {
        let p: SendMessagePayload = serde_json::from_str(
            r#"{"group_jid":null,"recipient_jid":"1@s.whatsapp.net","message":"hi"}"#,
        )
        .unwrap();
        assert!(matches!(p.validate(), Err(DispatchError::MissingField)));
    }

    #[test]
    fn whitespace_message_is_missing() {
        let p = payload("1@g.us", "2@s.whatsapp.net", "   ");
        assert!(matches!(p.validate(), Err(DispatchError::MissingField)));
    }

    #[test]
    fn missing_field_checked_before_jids() {
        let p = payload("not-a-jid", "", "hi");
        assert!(matches!(p.validate(), Err(DispatchError::MissingField)));
    }

    #[test]
    fn group_checked_before_recipient() {
        let p = payload("bad", "also-bad", "hi");
        assert!(matches!(
            p.validate(),
            Err(DispatchError::InvalidGroupIdentifier(_))
        ));

        let p = payload("1@g.us", "also-bad", "hi");
        assert!(matches!(
            p.validate(),
            Err(DispatchError::InvalidRecipientIdentifier(_))
        ));
    }

    #[test]
    fn message_kept_verbatim() {
        let req = payload("1@g.us", "2@s.whatsapp.net", "  spaced <b>out</b>\n")
            .validate()
            .unwrap();
        assert_eq!(req.text, "  spaced <b>out</b>\n");
        assert_eq!(req.group.to_string(), "1@g.us");
        assert_eq!(req.recipient.user(), "2");
    }

    #[test]
    fn send_result_omits_absent_fields() {
        let ok = serde_json::to_value(SendResult::ok("done")).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "message": "done"}));
        let err = serde_json::to_value(SendResult::err("boom")).unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "boom"}));
    }
}

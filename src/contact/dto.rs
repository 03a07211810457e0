use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::contact::repo_types::{Message, MessageStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_report: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_report: bool,
    pub status: MessageStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MessageView {
    pub fn of(message: Message) -> Self {
        Self {
            id: message.id,
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            is_report: message.is_report,
            status: message.status,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub success: bool,
    pub messages: Vec<MessageView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_request_defaults_missing_fields() {
        let req: ContactRequest = serde_json::from_str(r#"{"name":"Dev"}"#).unwrap();
        assert_eq!(req.name, "Dev");
        assert_eq!(req.email, "");
        assert!(!req.is_report);
    }

    #[test]
    fn message_view_is_camel_case() {
        let view = MessageView {
            id: Uuid::new_v4(),
            name: "Dev".into(),
            email: "dev2021@vitstudent.ac.in".into(),
            subject: "Broken listing".into(),
            message: "Images fail to load".into(),
            is_report: true,
            status: MessageStatus::New,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["isReport"], true);
        assert_eq!(json["status"], "new");
        assert!(json["createdAt"].as_str().unwrap().starts_with("1970"));
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Inbox lifecycle for a submission. Stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
    Resolved,
}

/// Contact-form submissions and listing reports share one table;
/// `is_report` tells them apart.
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_report: bool,
    pub status: MessageStatus,
    pub created_at: OffsetDateTime,
}

//! Notification entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A durable notification row, scoped to exactly one recipient for all
/// read/write/delete purposes. Sender and course are informational references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub course_id: Uuid,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Notification {
    /// Build an unread notification stamped with the supplied creation time.
    pub fn new(
        recipient_id: Uuid,
        sender_id: Option<Uuid>,
        course_id: Uuid,
        title: &str,
        message: &str,
        created_at: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id,
            course_id,
            title: title.to_string(),
            message: message.to_string(),
            read: false,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }
}

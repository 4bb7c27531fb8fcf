//! Enrollment request entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's pending ask to join a course, requiring approval.
///
/// `Pending` is the only non-terminal state; `Accepted` and `Rejected` are
/// terminal and no operation transitions out of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub state: EnrollmentState,
    pub requested_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl EnrollmentRequest {
    /// Whether the request is in a terminal state
    pub fn is_finalized(&self) -> bool {
        self.state != EnrollmentState::Pending
    }
}

/// Enrollment request state enum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnrollmentState {
    Pending,
    Accepted,
    Rejected,
}

impl EnrollmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentState::Pending => "pending",
            EnrollmentState::Accepted => "accepted",
            EnrollmentState::Rejected => "rejected",
        }
    }
}

impl From<&str> for EnrollmentState {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => EnrollmentState::Accepted,
            "rejected" => EnrollmentState::Rejected,
            _ => EnrollmentState::Pending,
        }
    }
}

impl ToString for EnrollmentState {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

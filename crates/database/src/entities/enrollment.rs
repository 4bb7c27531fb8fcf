//! Enrollment entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable record that a user participates in a course with a given type.
///
/// The schema enforces at most one enrollment per (user, course) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub enrollment_type: EnrollmentType,
    pub created_at: String,
    pub updated_at: String,
}

/// Enrollment type enum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnrollmentType {
    Student,
    Instructor,
}

impl EnrollmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentType::Student => "student",
            EnrollmentType::Instructor => "instructor",
        }
    }
}

impl From<&str> for EnrollmentType {
    fn from(s: &str) -> Self {
        match s {
            "instructor" => EnrollmentType::Instructor,
            _ => EnrollmentType::Student,
        }
    }
}

impl ToString for EnrollmentType {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

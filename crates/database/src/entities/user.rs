//! User entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity owned by the directory; read-only from the core's perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

/// Request for creating a new user (seeding and tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub role: UserRole,
}

/// User role enum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "instructor" => UserRole::Instructor,
            "admin" => UserRole::Admin,
            _ => UserRole::Student,
        }
    }
}

impl ToString for UserRole {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

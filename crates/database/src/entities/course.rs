//! Course entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course entity owned by the external course service; the core only reads it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request for creating a new course (seeding and tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

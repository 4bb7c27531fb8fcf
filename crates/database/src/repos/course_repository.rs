//! Course directory repository.
//!
//! Courses are owned by an external course service; the core resolves them
//! by id. `create` exists for seeding and tests.

use crate::entities::{Course, CreateCourseRequest};
use crate::repos::uuid_column;
use crate::types::{DirectoryError, DirectoryResult};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Repository for course directory lookups
#[derive(Clone)]
pub struct CourseRepository {
    pool: SqlitePool,
}

impl CourseRepository {
    /// Create a new course repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find course by ID
    pub async fn find_by_id(&self, id: Uuid) -> DirectoryResult<Option<Course>> {
        let row = sqlx::query(
            "SELECT id, title, description, image_url, created_at, updated_at
             FROM courses WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        row.map(|row| row_to_course(&row)).transpose()
    }

    /// Create a new course
    pub async fn create(&self, request: &CreateCourseRequest) -> DirectoryResult<Course> {
        let course = Course {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            description: request.description.clone(),
            image_url: request.image_url.clone(),
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO courses (id, title, description, image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(course.id.to_string())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.image_url)
        .bind(&course.created_at)
        .bind(&course.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        Ok(course)
    }
}

fn row_to_course(row: &SqliteRow) -> DirectoryResult<Course> {
    Ok(Course {
        id: uuid_column(row, "id").map_err(DirectoryError::Database)?,
        title: row
            .try_get("title")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
    })
}

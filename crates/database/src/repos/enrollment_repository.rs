//! Enrollment repository for database operations.

use crate::entities::{Enrollment, EnrollmentType};
use crate::repos::{is_unique_violation, uuid_column};
use crate::types::{EnrollmentError, EnrollmentResult, Page, PageRequest};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, course_id, enrollment_type, created_at, updated_at";

/// Repository for enrollment database operations
#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: SqlitePool,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find enrollment by ID
    pub async fn find_by_id(&self, id: Uuid) -> EnrollmentResult<Option<Enrollment>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM enrollments WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EnrollmentError::Database(e.to_string()))?;

        row.map(|row| row_to_enrollment(&row)).transpose()
    }

    /// Find the enrollment for a (user, course) pair, if any.
    ///
    /// Fast-path duplicate check; the schema constraint is the final arbiter.
    pub async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> EnrollmentResult<Option<Enrollment>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM enrollments WHERE user_id = ? AND course_id = ?"
        ))
        .bind(user_id.to_string())
        .bind(course_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EnrollmentError::Database(e.to_string()))?;

        row.map(|row| row_to_enrollment(&row)).transpose()
    }

    /// List all enrollments as a page
    pub async fn list_all(&self, request: &PageRequest) -> EnrollmentResult<Page<Enrollment>> {
        self.page_query("", vec![], request).await
    }

    /// List enrollments for a user as a page
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        request: &PageRequest,
    ) -> EnrollmentResult<Page<Enrollment>> {
        self.page_query("WHERE user_id = ?", vec![user_id.to_string()], request)
            .await
    }

    /// List enrollments for a course as a page
    pub async fn list_by_course(
        &self,
        course_id: Uuid,
        request: &PageRequest,
    ) -> EnrollmentResult<Page<Enrollment>> {
        self.page_query("WHERE course_id = ?", vec![course_id.to_string()], request)
            .await
    }

    /// List enrollments for a (user, course) pair as a page
    pub async fn list_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        request: &PageRequest,
    ) -> EnrollmentResult<Page<Enrollment>> {
        self.page_query(
            "WHERE user_id = ? AND course_id = ?",
            vec![user_id.to_string(), course_id.to_string()],
            request,
        )
        .await
    }

    /// Enumerate every enrollment for a course (fan-out audience selection)
    pub async fn find_all_by_course(&self, course_id: Uuid) -> EnrollmentResult<Vec<Enrollment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM enrollments WHERE course_id = ? ORDER BY created_at"
        ))
        .bind(course_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EnrollmentError::Database(e.to_string()))?;

        rows.iter().map(row_to_enrollment).collect()
    }

    /// Create a new enrollment.
    ///
    /// A uniqueness violation on (user_id, course_id) is reported as
    /// `AlreadyEnrolled`, same as the fast-path check.
    pub async fn create(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        enrollment_type: EnrollmentType,
    ) -> EnrollmentResult<Enrollment> {
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            enrollment_type,
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO enrollments (id, user_id, course_id, enrollment_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(enrollment.id.to_string())
        .bind(enrollment.user_id.to_string())
        .bind(enrollment.course_id.to_string())
        .bind(enrollment.enrollment_type.to_string())
        .bind(&enrollment.created_at)
        .bind(&enrollment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                EnrollmentError::AlreadyEnrolled { user_id, course_id }
            } else {
                EnrollmentError::Database(e.to_string())
            }
        })?;

        Ok(enrollment)
    }

    /// Delete enrollment by ID
    pub async fn delete(&self, id: Uuid) -> EnrollmentResult<()> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| EnrollmentError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(EnrollmentError::EnrollmentNotFound(id));
        }
        Ok(())
    }

    async fn page_query(
        &self,
        where_clause: &str,
        binds: Vec<String>,
        request: &PageRequest,
    ) -> EnrollmentResult<Page<Enrollment>> {
        let count_sql = format!("SELECT COUNT(*) FROM enrollments {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EnrollmentError::Database(e.to_string()))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM enrollments {where_clause} ORDER BY {} {} LIMIT ? OFFSET ?",
            sort_column(request),
            request.direction.as_sql()
        );
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EnrollmentError::Database(e.to_string()))?;

        let content = rows
            .iter()
            .map(row_to_enrollment)
            .collect::<EnrollmentResult<Vec<_>>>()?;
        Ok(Page::new(content, request, total))
    }
}

// Sortable columns are whitelisted; anything else falls back to created_at.
fn sort_column(request: &PageRequest) -> &'static str {
    match request.sort_by.as_deref() {
        Some("updated_at") => "updated_at",
        Some("enrollment_type") => "enrollment_type",
        _ => "created_at",
    }
}

fn row_to_enrollment(row: &SqliteRow) -> EnrollmentResult<Enrollment> {
    Ok(Enrollment {
        id: uuid_column(row, "id").map_err(EnrollmentError::Database)?,
        user_id: uuid_column(row, "user_id").map_err(EnrollmentError::Database)?,
        course_id: uuid_column(row, "course_id").map_err(EnrollmentError::Database)?,
        enrollment_type: EnrollmentType::from(
            row.try_get::<String, _>("enrollment_type")
                .map_err(|e| EnrollmentError::Database(e.to_string()))?
                .as_str(),
        ),
        created_at: row
            .try_get("created_at")
            .map_err(|e| EnrollmentError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| EnrollmentError::Database(e.to_string()))?,
    })
}

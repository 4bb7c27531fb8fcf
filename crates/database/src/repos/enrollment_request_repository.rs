//! Enrollment request repository for database operations.
//!
//! Holds the state-machine transitions: accept and reject run inside a
//! single transaction with a state-guarded UPDATE so that two concurrent
//! finalizations of the same pending request cannot both succeed.

use crate::entities::{Enrollment, EnrollmentRequest, EnrollmentState, EnrollmentType};
use crate::repos::{is_unique_violation, uuid_column};
use crate::types::{EnrollmentRequestError, EnrollmentRequestResult, Page, PageRequest};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, course_id, state, requested_at, created_at, updated_at";

/// Repository for enrollment request database operations
#[derive(Clone)]
pub struct EnrollmentRequestRepository {
    pool: SqlitePool,
}

impl EnrollmentRequestRepository {
    /// Create a new enrollment request repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find enrollment request by ID
    pub async fn find_by_id(&self, id: Uuid) -> EnrollmentRequestResult<Option<EnrollmentRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM enrollment_requests WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        row.map(|row| row_to_request(&row)).transpose()
    }

    /// Find the request for a (course, user) pair in any state, if any
    pub async fn find_by_course_and_user(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> EnrollmentRequestResult<Option<EnrollmentRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM enrollment_requests WHERE course_id = ? AND user_id = ?"
        ))
        .bind(course_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        row.map(|row| row_to_request(&row)).transpose()
    }

    /// List requests for a course as a page
    pub async fn list_by_course(
        &self,
        course_id: Uuid,
        request: &PageRequest,
    ) -> EnrollmentRequestResult<Page<EnrollmentRequest>> {
        self.page_query("WHERE course_id = ?", vec![course_id.to_string()], request)
            .await
    }

    /// List requests from a user as a page
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        request: &PageRequest,
    ) -> EnrollmentRequestResult<Page<EnrollmentRequest>> {
        self.page_query("WHERE user_id = ?", vec![user_id.to_string()], request)
            .await
    }

    /// Create a new pending request.
    ///
    /// A uniqueness violation on (course_id, user_id) is reported as
    /// `AlreadyRequested`, same as the service-level fast-path check.
    pub async fn create(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> EnrollmentRequestResult<EnrollmentRequest> {
        let now = Utc::now().to_rfc3339();
        let request = EnrollmentRequest {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            state: EnrollmentState::Pending,
            requested_at: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO enrollment_requests (id, user_id, course_id, state, requested_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(request.user_id.to_string())
        .bind(request.course_id.to_string())
        .bind(request.state.to_string())
        .bind(&request.requested_at)
        .bind(&request.created_at)
        .bind(&request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                EnrollmentRequestError::AlreadyRequested { course_id, user_id }
            } else {
                EnrollmentRequestError::Database(e.to_string())
            }
        })?;

        Ok(request)
    }

    /// Accept a pending request and create its enrollment in one transaction.
    ///
    /// If the enrollment insert hits the (user, course) uniqueness constraint
    /// the whole transaction rolls back; the request is never left accepted
    /// without a corresponding enrollment.
    pub async fn accept(
        &self,
        id: Uuid,
        enrollment_type: EnrollmentType,
    ) -> EnrollmentRequestResult<(EnrollmentRequest, Enrollment)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        let request = finalize_in_tx(&mut tx, id, EnrollmentState::Accepted).await?;

        let now = Utc::now().to_rfc3339();
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            course_id: request.course_id,
            enrollment_type,
            created_at: now.clone(),
            updated_at: now,
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
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                EnrollmentRequestError::AlreadyEnrolled {
                    user_id: request.user_id,
                    course_id: request.course_id,
                }
            } else {
                EnrollmentRequestError::Database(e.to_string())
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        Ok((request, enrollment))
    }

    /// Reject a pending request. No enrollment side effect.
    pub async fn reject(&self, id: Uuid) -> EnrollmentRequestResult<EnrollmentRequest> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        let request = finalize_in_tx(&mut tx, id, EnrollmentState::Rejected).await?;

        tx.commit()
            .await
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        Ok(request)
    }

    /// Delete a request regardless of state
    pub async fn delete(&self, id: Uuid) -> EnrollmentRequestResult<()> {
        let result = sqlx::query("DELETE FROM enrollment_requests WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(EnrollmentRequestError::RequestNotFound(id));
        }
        Ok(())
    }

    async fn page_query(
        &self,
        where_clause: &str,
        binds: Vec<String>,
        request: &PageRequest,
    ) -> EnrollmentRequestResult<Page<EnrollmentRequest>> {
        let count_sql = format!("SELECT COUNT(*) FROM enrollment_requests {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM enrollment_requests {where_clause} ORDER BY {} {} LIMIT ? OFFSET ?",
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
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

        let content = rows
            .iter()
            .map(row_to_request)
            .collect::<EnrollmentRequestResult<Vec<_>>>()?;
        Ok(Page::new(content, request, total))
    }
}

/// Load a request and flip it to a terminal state inside the transaction.
///
/// The UPDATE is guarded on `state = 'pending'`; zero affected rows means a
/// concurrent caller finalized first, which surfaces as `AlreadyFinalized`.
async fn finalize_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    target: EnrollmentState,
) -> EnrollmentRequestResult<EnrollmentRequest> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM enrollment_requests WHERE id = ?"
    ))
    .bind(id.to_string())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

    let Some(row) = row else {
        return Err(EnrollmentRequestError::RequestNotFound(id));
    };
    let mut request = row_to_request(&row)?;

    if request.is_finalized() {
        return Err(EnrollmentRequestError::AlreadyFinalized(id));
    }

    let now = Utc::now().to_rfc3339();
    let updated = sqlx::query(
        "UPDATE enrollment_requests SET state = ?, updated_at = ? WHERE id = ? AND state = 'pending'",
    )
    .bind(target.to_string())
    .bind(&now)
    .bind(id.to_string())
    .execute(&mut **tx)
    .await
    .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?;

    if updated.rows_affected() == 0 {
        return Err(EnrollmentRequestError::AlreadyFinalized(id));
    }

    request.state = target;
    request.updated_at = now;
    Ok(request)
}

fn sort_column(request: &PageRequest) -> &'static str {
    match request.sort_by.as_deref() {
        Some("requested_at") => "requested_at",
        Some("updated_at") => "updated_at",
        Some("state") => "state",
        _ => "created_at",
    }
}

fn row_to_request(row: &SqliteRow) -> EnrollmentRequestResult<EnrollmentRequest> {
    Ok(EnrollmentRequest {
        id: uuid_column(row, "id").map_err(EnrollmentRequestError::Database)?,
        user_id: uuid_column(row, "user_id").map_err(EnrollmentRequestError::Database)?,
        course_id: uuid_column(row, "course_id").map_err(EnrollmentRequestError::Database)?,
        state: EnrollmentState::from(
            row.try_get::<String, _>("state")
                .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?
                .as_str(),
        ),
        requested_at: row
            .try_get("requested_at")
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| EnrollmentRequestError::Database(e.to_string()))?,
    })
}

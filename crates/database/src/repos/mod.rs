//! Repository implementations for the Campus storage layer

pub mod course_repository;
pub mod enrollment_repository;
pub mod enrollment_request_repository;
pub mod notification_repository;
pub mod user_repository;

pub use course_repository::CourseRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use enrollment_request_repository::EnrollmentRequestRepository;
pub use notification_repository::NotificationRepository;
pub use user_repository::UserRepository;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Whether an insert failed on a schema-level uniqueness constraint.
///
/// The read-then-write duplicate checks in the services are racy; the
/// constraint is the final arbiter and its violation maps to the same
/// already-exists error at the service boundary.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn uuid_column(row: &SqliteRow, column: &str) -> Result<Uuid, String> {
    let value: String = row.try_get(column).map_err(|e| e.to_string())?;
    Uuid::parse_str(&value).map_err(|e| e.to_string())
}

pub(crate) fn optional_uuid_column(row: &SqliteRow, column: &str) -> Result<Option<Uuid>, String> {
    let value: Option<String> = row.try_get(column).map_err(|e| e.to_string())?;
    value
        .map(|v| Uuid::parse_str(&v).map_err(|e| e.to_string()))
        .transpose()
}

//! Error types for the storage layer

use thiserror::Error;
use uuid::Uuid;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database query error: {0}")]
    QueryError(String),
}

/// Directory (user/course lookup) errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User with id {0} was not found")]
    UserNotFound(Uuid),

    #[error("Course with id {0} was not found")]
    CourseNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

/// Enrollment registry errors
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("Enrollment with id {0} was not found")]
    EnrollmentNotFound(Uuid),

    #[error("User with id {0} was not found")]
    UserNotFound(Uuid),

    #[error("Course with id {0} was not found")]
    CourseNotFound(Uuid),

    #[error("Enrollment for user {user_id} and course {course_id} already exists")]
    AlreadyEnrolled { user_id: Uuid, course_id: Uuid },

    #[error("Database error: {0}")]
    Database(String),
}

/// Enrollment request workflow errors
#[derive(Debug, Error)]
pub enum EnrollmentRequestError {
    #[error("Enrollment request with id {0} was not found")]
    RequestNotFound(Uuid),

    #[error("Enrollment request for course {course_id} and user {user_id} already exists")]
    AlreadyRequested { course_id: Uuid, user_id: Uuid },

    #[error("Enrollment request with id {0} is already in a final state")]
    AlreadyFinalized(Uuid),

    #[error("User with id {0} was not found")]
    UserNotFound(Uuid),

    #[error("Course with id {0} was not found")]
    CourseNotFound(Uuid),

    #[error("Enrollment for user {user_id} and course {course_id} already exists")]
    AlreadyEnrolled { user_id: Uuid, course_id: Uuid },

    #[error("Database error: {0}")]
    Database(String),
}

/// Notification errors
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification with id {id} for recipient {recipient_id} was not found")]
    NotificationNotFound { id: Uuid, recipient_id: Uuid },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DirectoryError> for EnrollmentError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UserNotFound(id) => EnrollmentError::UserNotFound(id),
            DirectoryError::CourseNotFound(id) => EnrollmentError::CourseNotFound(id),
            DirectoryError::Database(message) => EnrollmentError::Database(message),
        }
    }
}

impl From<DirectoryError> for EnrollmentRequestError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UserNotFound(id) => EnrollmentRequestError::UserNotFound(id),
            DirectoryError::CourseNotFound(id) => EnrollmentRequestError::CourseNotFound(id),
            DirectoryError::Database(message) => EnrollmentRequestError::Database(message),
        }
    }
}

impl From<DirectoryError> for NotificationError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Database(message) => NotificationError::Database(message),
            other => NotificationError::Database(other.to_string()),
        }
    }
}

impl From<EnrollmentError> for NotificationError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::Database(message) => NotificationError::Database(message),
            other => NotificationError::Database(other.to_string()),
        }
    }
}

impl From<EnrollmentError> for EnrollmentRequestError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::AlreadyEnrolled { user_id, course_id } => {
                EnrollmentRequestError::AlreadyEnrolled { user_id, course_id }
            }
            EnrollmentError::UserNotFound(id) => EnrollmentRequestError::UserNotFound(id),
            EnrollmentError::CourseNotFound(id) => EnrollmentRequestError::CourseNotFound(id),
            other => EnrollmentRequestError::Database(other.to_string()),
        }
    }
}

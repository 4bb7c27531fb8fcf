//! Campus Database Crate
//!
//! Storage layer for the Campus course-platform backend: connection
//! management, migrations, entities, and repository implementations for the
//! enrollment lifecycle and notification fan-out core.

use sqlx::SqlitePool;

use campus_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{
    CourseRepository, EnrollmentRepository, EnrollmentRequestRepository, NotificationRepository,
    UserRepository,
};

// Re-export entities
pub use entities::{
    course::{Course, CreateCourseRequest},
    enrollment::{Enrollment, EnrollmentType},
    enrollment_request::{EnrollmentRequest, EnrollmentState},
    notification::Notification,
    user::{CreateUserRequest, User, UserRole},
};

// Re-export types
pub use types::{
    errors::{
        DatabaseError, DirectoryError, EnrollmentError, EnrollmentRequestError, NotificationError,
    },
    DatabaseResult, DirectoryResult, EnrollmentRequestResult, EnrollmentResult, NotificationResult,
    Page, PageRequest, SortDirection,
};


/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

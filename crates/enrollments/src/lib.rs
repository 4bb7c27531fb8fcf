//! # Campus Enrollments Crate
//!
//! Enrollment lifecycle core for the Campus course platform: the registry
//! that enforces at most one enrollment per (user, course) pair, and the
//! request workflow that turns a user's ask to join a course into an
//! approved or rejected decision.
//!
//! ## Architecture
//!
//! - **Services**: Business logic layer (registry + workflow state machine)
//! - Entities, repositories, and error types live in `campus-database`

pub mod services;

// Re-export database types and repositories
pub use campus_database::{
    Enrollment, EnrollmentError, EnrollmentRepository, EnrollmentRequest, EnrollmentRequestError,
    EnrollmentRequestRepository, EnrollmentRequestResult, EnrollmentResult, EnrollmentState,
    EnrollmentType, Page, PageRequest, SortDirection,
};

// Re-export main types for convenience
pub use services::{
    EnrollmentFilter, EnrollmentRequestFilter, EnrollmentRequestService, EnrollmentService,
};

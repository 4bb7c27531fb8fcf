//! Enrollment services

pub mod enrollment_request_service;
pub mod enrollment_service;

pub use enrollment_request_service::{EnrollmentRequestFilter, EnrollmentRequestService};
pub use enrollment_service::{EnrollmentFilter, EnrollmentService};

//! # Campus Notifications Crate
//!
//! Notification fan-out engine for the Campus course platform: course
//! events become one durable notification row per audience member (the
//! full user directory, or a course's current enrollees), plus the
//! recipient-scoped read/mark/delete API over those rows.

pub mod services;

// Re-export database types and repositories
pub use campus_database::{
    Notification, NotificationError, NotificationRepository, NotificationResult, Page, PageRequest,
};

// Re-export main types for convenience
pub use services::NotificationService;

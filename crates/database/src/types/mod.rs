//! Shared types and result types for the storage layer

pub mod errors;
pub mod page;

// Re-export common types
pub use errors::{
    DatabaseError, DirectoryError, EnrollmentError, EnrollmentRequestError, NotificationError,
};
pub use page::{Page, PageRequest, SortDirection};

// Common result types
pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type DirectoryResult<T> = Result<T, DirectoryError>;
pub type EnrollmentResult<T> = Result<T, EnrollmentError>;
pub type EnrollmentRequestResult<T> = Result<T, EnrollmentRequestError>;
pub type NotificationResult<T> = Result<T, NotificationError>;

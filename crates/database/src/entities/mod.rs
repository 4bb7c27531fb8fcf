//! Entity definitions for the Campus storage layer

pub mod course;
pub mod enrollment;
pub mod enrollment_request;
pub mod notification;
pub mod user;

pub use course::{Course, CreateCourseRequest};
pub use enrollment::{Enrollment, EnrollmentType};
pub use enrollment_request::{EnrollmentRequest, EnrollmentState};
pub use notification::Notification;
pub use user::{CreateUserRequest, User, UserRole};

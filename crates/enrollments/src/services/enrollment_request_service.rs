//! Enrollment request workflow service.
//!
//! State machine per request:
//! pending --accept--> accepted (side effect: enrollment created)
//! pending --reject--> rejected
//! accepted and rejected are terminal.

use campus_database::{
    CourseRepository, Enrollment, EnrollmentRequest, EnrollmentRequestError,
    EnrollmentRequestRepository, EnrollmentRequestResult, EnrollmentType, Page, PageRequest,
    UserRepository,
};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Filter for listing enrollment requests
#[derive(Debug, Clone, Copy)]
pub enum EnrollmentRequestFilter {
    ByCourse(Uuid),
    ByUser(Uuid),
}

/// Service for the enrollment request workflow
pub struct EnrollmentRequestService {
    user_repository: UserRepository,
    course_repository: CourseRepository,
    request_repository: EnrollmentRequestRepository,
}

impl EnrollmentRequestService {
    /// Create a new enrollment request service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            course_repository: CourseRepository::new(pool.clone()),
            request_repository: EnrollmentRequestRepository::new(pool),
        }
    }

    /// Create a pending request for a (course, user) pair.
    ///
    /// Any existing request for the pair blocks creation, whatever its
    /// state; a once-rejected user cannot request again through this path.
    pub async fn create_enrollment_request(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> EnrollmentRequestResult<EnrollmentRequest> {
        if self
            .request_repository
            .find_by_course_and_user(course_id, user_id)
            .await?
            .is_some()
        {
            return Err(EnrollmentRequestError::AlreadyRequested { course_id, user_id });
        }

        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(EnrollmentRequestError::UserNotFound(user_id))?;
        self.course_repository
            .find_by_id(course_id)
            .await?
            .ok_or(EnrollmentRequestError::CourseNotFound(course_id))?;

        let request = self.request_repository.create(course_id, user_id).await?;

        info!(
            request_id = %request.id,
            user_id = %user_id,
            course_id = %course_id,
            "enrollment request created"
        );
        Ok(request)
    }

    /// Accept a pending request; creates the enrollment in the same unit of
    /// work, so a duplicate enrollment rolls the transition back too.
    pub async fn accept_enrollment_request(
        &self,
        id: Uuid,
    ) -> EnrollmentRequestResult<(EnrollmentRequest, Enrollment)> {
        let (request, enrollment) = self
            .request_repository
            .accept(id, EnrollmentType::Student)
            .await?;

        info!(
            request_id = %request.id,
            enrollment_id = %enrollment.id,
            "enrollment request accepted"
        );
        Ok((request, enrollment))
    }

    /// Reject a pending request; no enrollment side effect
    pub async fn reject_enrollment_request(
        &self,
        id: Uuid,
    ) -> EnrollmentRequestResult<EnrollmentRequest> {
        let request = self.request_repository.reject(id).await?;

        info!(request_id = %request.id, "enrollment request rejected");
        Ok(request)
    }

    /// Delete a request regardless of state
    pub async fn delete_enrollment_request(&self, id: Uuid) -> EnrollmentRequestResult<()> {
        self.request_repository.delete(id).await?;
        info!(request_id = %id, "enrollment request deleted");
        Ok(())
    }

    /// List requests matching a filter, as a page
    pub async fn list_enrollment_requests(
        &self,
        filter: EnrollmentRequestFilter,
        page: &PageRequest,
    ) -> EnrollmentRequestResult<Page<EnrollmentRequest>> {
        match filter {
            EnrollmentRequestFilter::ByCourse(course_id) => {
                self.request_repository.list_by_course(course_id, page).await
            }
            EnrollmentRequestFilter::ByUser(user_id) => {
                self.request_repository.list_by_user(user_id, page).await
            }
        }
    }
}

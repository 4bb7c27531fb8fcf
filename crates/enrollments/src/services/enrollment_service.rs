//! Enrollment registry service.

use campus_database::{
    CourseRepository, Enrollment, EnrollmentError, EnrollmentRepository, EnrollmentResult,
    EnrollmentType, Page, PageRequest, UserRepository,
};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Filter for listing enrollments
#[derive(Debug, Clone, Copy)]
pub enum EnrollmentFilter {
    All,
    ByUser(Uuid),
    ByCourse(Uuid),
    ByUserAndCourse(Uuid, Uuid),
}

/// Service enforcing at most one enrollment per (user, course) pair
pub struct EnrollmentService {
    user_repository: UserRepository,
    course_repository: CourseRepository,
    enrollment_repository: EnrollmentRepository,
}

impl EnrollmentService {
    /// Create a new enrollment service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            course_repository: CourseRepository::new(pool.clone()),
            enrollment_repository: EnrollmentRepository::new(pool),
        }
    }

    /// Create an enrollment for a (user, course) pair.
    ///
    /// The existence check here is a fast path for a friendly error; the
    /// schema-level uniqueness constraint is the final arbiter and its
    /// violation surfaces as the same `AlreadyEnrolled`.
    pub async fn create_enrollment(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        enrollment_type: EnrollmentType,
    ) -> EnrollmentResult<Enrollment> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(EnrollmentError::UserNotFound(user_id))?;
        self.course_repository
            .find_by_id(course_id)
            .await?
            .ok_or(EnrollmentError::CourseNotFound(course_id))?;

        if self
            .enrollment_repository
            .find_by_user_and_course(user_id, course_id)
            .await?
            .is_some()
        {
            return Err(EnrollmentError::AlreadyEnrolled { user_id, course_id });
        }

        let enrollment = self
            .enrollment_repository
            .create(user_id, course_id, enrollment_type)
            .await?;

        info!(
            enrollment_id = %enrollment.id,
            user_id = %user_id,
            course_id = %course_id,
            "enrollment created"
        );
        Ok(enrollment)
    }

    /// Get an enrollment by id
    pub async fn get_enrollment(&self, id: Uuid) -> EnrollmentResult<Enrollment> {
        self.enrollment_repository
            .find_by_id(id)
            .await?
            .ok_or(EnrollmentError::EnrollmentNotFound(id))
    }

    /// List enrollments matching a filter, as a page
    pub async fn list_enrollments(
        &self,
        filter: EnrollmentFilter,
        page: &PageRequest,
    ) -> EnrollmentResult<Page<Enrollment>> {
        match filter {
            EnrollmentFilter::All => self.enrollment_repository.list_all(page).await,
            EnrollmentFilter::ByUser(user_id) => {
                self.enrollment_repository.list_by_user(user_id, page).await
            }
            EnrollmentFilter::ByCourse(course_id) => {
                self.enrollment_repository
                    .list_by_course(course_id, page)
                    .await
            }
            EnrollmentFilter::ByUserAndCourse(user_id, course_id) => {
                self.enrollment_repository
                    .list_by_user_and_course(user_id, course_id, page)
                    .await
            }
        }
    }

    /// Delete an enrollment by id
    pub async fn delete_enrollment(&self, id: Uuid) -> EnrollmentResult<()> {
        self.enrollment_repository.delete(id).await?;
        info!(enrollment_id = %id, "enrollment deleted");
        Ok(())
    }
}

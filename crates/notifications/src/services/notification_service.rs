//! Notification fan-out service.
//!
//! Course events are turned into one notification row per audience member:
//! a course creation broadcasts to the entire user directory, a course
//! update broadcasts to the course's current enrollees. Recipient-scoped
//! read/mark/delete operations take the resolved recipient id explicitly.

use campus_database::{
    Course, EnrollmentRepository, Notification, NotificationRepository, NotificationResult, Page,
    PageRequest, User, UserRepository,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

const COURSE_CREATED_TITLE: &str = "New course";
const COURSE_UPDATED_TITLE: &str = "Course updated";

/// Service for notification fan-out and recipient-scoped access
pub struct NotificationService {
    user_repository: UserRepository,
    enrollment_repository: EnrollmentRepository,
    notification_repository: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            enrollment_repository: EnrollmentRepository::new(pool.clone()),
            notification_repository: NotificationRepository::new(pool),
        }
    }

    /// Broadcast a course creation to every user in the directory.
    ///
    /// Materializes the whole audience and batch in memory, O(total user
    /// count) in memory and writes; accepted limitation of the current
    /// contract. The batch is persisted atomically.
    pub async fn notify_all_users_course_created(
        &self,
        course: &Course,
        sender_id: Option<Uuid>,
    ) -> NotificationResult<usize> {
        let sender = self.resolve_sender(sender_id).await?;
        let sender_id = sender.map(|s| s.id);

        let users = self.user_repository.find_all().await?;
        let created_at = Utc::now().to_rfc3339();
        let batch: Vec<Notification> = users
            .iter()
            .map(|user| {
                Notification::new(
                    user.id,
                    sender_id,
                    course.id,
                    COURSE_CREATED_TITLE,
                    &course.title,
                    &created_at,
                )
            })
            .collect();

        let written = self.notification_repository.save_all(&batch).await?;
        info!(
            course_id = %course.id,
            recipients = written,
            "course creation broadcast to full directory"
        );
        Ok(written)
    }

    /// Broadcast a course update to the course's current enrollees.
    ///
    /// Zero enrollments short-circuits without any batch write. An
    /// enrollment whose user reference no longer resolves is skipped. An
    /// empty `message` falls back to the course title.
    pub async fn notify_enrolled_users_course_updated(
        &self,
        course: &Course,
        sender_id: Option<Uuid>,
        message: &str,
    ) -> NotificationResult<usize> {
        let enrollments = self.enrollment_repository.find_all_by_course(course.id).await?;
        if enrollments.is_empty() {
            return Ok(0);
        }

        let sender = self.resolve_sender(sender_id).await?;
        let sender_id = sender.map(|s| s.id);
        let body = if message.is_empty() {
            course.title.as_str()
        } else {
            message
        };

        let created_at = Utc::now().to_rfc3339();
        let mut batch = Vec::with_capacity(enrollments.len());
        for enrollment in &enrollments {
            let Some(user) = self.user_repository.find_by_id(enrollment.user_id).await? else {
                warn!(
                    enrollment_id = %enrollment.id,
                    user_id = %enrollment.user_id,
                    "skipping enrollment with unresolvable user"
                );
                continue;
            };
            batch.push(Notification::new(
                user.id,
                sender_id,
                course.id,
                COURSE_UPDATED_TITLE,
                body,
                &created_at,
            ));
        }

        let written = self.notification_repository.save_all(&batch).await?;
        info!(
            course_id = %course.id,
            recipients = written,
            "course update broadcast to enrollees"
        );
        Ok(written)
    }

    /// List a recipient's notifications, most recent first
    pub async fn list_notifications_by_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> NotificationResult<Page<Notification>> {
        self.notification_repository
            .find_by_recipient(recipient_id, page)
            .await
    }

    /// Count a recipient's unread notifications
    pub async fn unread_notification_count(&self, recipient_id: Uuid) -> NotificationResult<i64> {
        self.notification_repository
            .count_unread_by_recipient(recipient_id)
            .await
    }

    /// Mark a recipient's notification as read
    pub async fn mark_notification_as_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> NotificationResult<()> {
        self.notification_repository
            .mark_as_read(id, recipient_id)
            .await
    }

    /// Delete a recipient's notification
    pub async fn delete_notification(&self, id: Uuid, recipient_id: Uuid) -> NotificationResult<()> {
        self.notification_repository.delete(id, recipient_id).await
    }

    /// Delete every notification owned by a recipient
    pub async fn delete_all_notifications_for_recipient(
        &self,
        recipient_id: Uuid,
    ) -> NotificationResult<u64> {
        let removed = self
            .notification_repository
            .delete_all_by_recipient(recipient_id)
            .await?;
        info!(recipient_id = %recipient_id, removed, "recipient notifications cleared");
        Ok(removed)
    }

    // An unresolvable sender does not block a broadcast; the notifications
    // are created without one.
    async fn resolve_sender(&self, sender_id: Option<Uuid>) -> NotificationResult<Option<User>> {
        let Some(id) = sender_id else {
            return Ok(None);
        };
        let sender = self.user_repository.find_by_id(id).await?;
        if sender.is_none() {
            warn!(sender_id = %id, "broadcast sender did not resolve, sending without one");
        }
        Ok(sender)
    }
}

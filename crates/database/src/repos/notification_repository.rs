//! Notification repository for database operations.
//!
//! All read/mark/delete operations are scoped to the recipient; a row owned
//! by someone else is indistinguishable from a missing row.

use crate::entities::Notification;
use crate::repos::{optional_uuid_column, uuid_column};
use crate::types::{NotificationError, NotificationResult, Page, PageRequest};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const COLUMNS: &str =
    "id, recipient_id, sender_id, course_id, title, message, is_read, created_at, updated_at";

/// Repository for notification database operations
#[derive(Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find notifications for a recipient, most recent first
    pub async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
        request: &PageRequest,
    ) -> NotificationResult<Page<Notification>> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ?",
        )
        .bind(recipient_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| NotificationError::Database(e.to_string()))?;

        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE recipient_id = ?
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(recipient_id.to_string())
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NotificationError::Database(e.to_string()))?;

        let content = rows
            .iter()
            .map(row_to_notification)
            .collect::<NotificationResult<Vec<_>>>()?;
        Ok(Page::new(content, request, total))
    }

    /// Count a recipient's unread notifications
    pub async fn count_unread_by_recipient(&self, recipient_id: Uuid) -> NotificationResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| NotificationError::Database(e.to_string()))
    }

    /// Find a notification constrained by both id and recipient
    pub async fn find_by_id_and_recipient(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> NotificationResult<Option<Notification>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE id = ? AND recipient_id = ?"
        ))
        .bind(id.to_string())
        .bind(recipient_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NotificationError::Database(e.to_string()))?;

        row.map(|row| row_to_notification(&row)).transpose()
    }

    /// Persist a batch of notifications as a whole.
    ///
    /// Either every row is written or none are; a failure mid-batch rolls
    /// back to avoid partial fan-out. An empty batch performs no writes.
    pub async fn save_all(&self, batch: &[Notification]) -> NotificationResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        for notification in batch {
            sqlx::query(
                "INSERT INTO notifications (id, recipient_id, sender_id, course_id, title, message, is_read, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(notification.id.to_string())
            .bind(notification.recipient_id.to_string())
            .bind(notification.sender_id.map(|id| id.to_string()))
            .bind(notification.course_id.to_string())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.read)
            .bind(&notification.created_at)
            .bind(&notification.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        Ok(batch.len())
    }

    /// Mark a recipient's notification as read.
    ///
    /// Zero affected rows means the id does not exist or belongs to another
    /// recipient; both collapse into the same not-found error.
    pub async fn mark_as_read(&self, id: Uuid, recipient_id: Uuid) -> NotificationResult<()> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1, updated_at = ? WHERE id = ? AND recipient_id = ?",
        )
        .bind(&now)
        .bind(id.to_string())
        .bind(recipient_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| NotificationError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(NotificationError::NotificationNotFound { id, recipient_id });
        }
        Ok(())
    }

    /// Delete a recipient's notification
    pub async fn delete(&self, id: Uuid, recipient_id: Uuid) -> NotificationResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND recipient_id = ?")
            .bind(id.to_string())
            .bind(recipient_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(NotificationError::NotificationNotFound { id, recipient_id });
        }
        Ok(())
    }

    /// Delete every notification owned by a recipient; zero matches is fine
    pub async fn delete_all_by_recipient(&self, recipient_id: Uuid) -> NotificationResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = ?")
            .bind(recipient_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

fn row_to_notification(row: &SqliteRow) -> NotificationResult<Notification> {
    Ok(Notification {
        id: uuid_column(row, "id").map_err(NotificationError::Database)?,
        recipient_id: uuid_column(row, "recipient_id").map_err(NotificationError::Database)?,
        sender_id: optional_uuid_column(row, "sender_id").map_err(NotificationError::Database)?,
        course_id: uuid_column(row, "course_id").map_err(NotificationError::Database)?,
        title: row
            .try_get("title")
            .map_err(|e| NotificationError::Database(e.to_string()))?,
        message: row
            .try_get("message")
            .map_err(|e| NotificationError::Database(e.to_string()))?,
        read: row
            .try_get("is_read")
            .map_err(|e| NotificationError::Database(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| NotificationError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| NotificationError::Database(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_notifications.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePool::connect(&db_url).await.unwrap();

        sqlx::query(
            "CREATE TABLE notifications (
                id TEXT PRIMARY KEY,
                recipient_id TEXT NOT NULL,
                sender_id TEXT,
                course_id TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        (pool, temp_dir)
    }

    fn notification(recipient_id: Uuid, created_at: &str) -> Notification {
        Notification::new(
            recipient_id,
            Some(Uuid::new_v4()),
            Uuid::new_v4(),
            "New course",
            "Rust 101",
            created_at,
        )
    }

    #[tokio::test]
    async fn test_save_all_and_find_by_recipient() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);
        let recipient_id = Uuid::new_v4();

        let batch = vec![
            notification(recipient_id, "2026-01-01T10:00:00+00:00"),
            notification(recipient_id, "2026-01-01T12:00:00+00:00"),
            notification(Uuid::new_v4(), "2026-01-01T11:00:00+00:00"),
        ];
        let written = repo.save_all(&batch).await.unwrap();
        assert_eq!(written, 3);

        let page = repo
            .find_by_recipient(recipient_id, &PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 2);
        // Most recent first.
        assert_eq!(page.content[0].created_at, "2026-01-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn test_save_all_empty_batch_writes_nothing() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool.clone());

        let written = repo.save_all(&[]).await.unwrap();
        assert_eq!(written, 0);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_unread_count_and_mark_as_read() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);
        let recipient_id = Uuid::new_v4();

        let batch = vec![
            notification(recipient_id, "2026-01-01T10:00:00+00:00"),
            notification(recipient_id, "2026-01-01T11:00:00+00:00"),
        ];
        repo.save_all(&batch).await.unwrap();

        assert_eq!(repo.count_unread_by_recipient(recipient_id).await.unwrap(), 2);

        repo.mark_as_read(batch[0].id, recipient_id).await.unwrap();
        assert_eq!(repo.count_unread_by_recipient(recipient_id).await.unwrap(), 1);

        let reloaded = repo
            .find_by_id_and_recipient(batch[0].id, recipient_id)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.read);
    }

    #[tokio::test]
    async fn test_mark_as_read_is_recipient_scoped() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let batch = vec![notification(owner, "2026-01-01T10:00:00+00:00")];
        repo.save_all(&batch).await.unwrap();

        // Someone else's id and a missing id fail identically.
        let err = repo.mark_as_read(batch[0].id, other).await.unwrap_err();
        assert!(matches!(err, NotificationError::NotificationNotFound { .. }));
        let err = repo.mark_as_read(Uuid::new_v4(), owner).await.unwrap_err();
        assert!(matches!(err, NotificationError::NotificationNotFound { .. }));

        // The row itself is untouched.
        let reloaded = repo
            .find_by_id_and_recipient(batch[0].id, owner)
            .await
            .unwrap()
            .unwrap();
        assert!(!reloaded.read);
    }

    #[tokio::test]
    async fn test_delete_is_recipient_scoped() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);
        let owner = Uuid::new_v4();

        let batch = vec![notification(owner, "2026-01-01T10:00:00+00:00")];
        repo.save_all(&batch).await.unwrap();

        let err = repo.delete(batch[0].id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, NotificationError::NotificationNotFound { .. }));

        repo.delete(batch[0].id, owner).await.unwrap();
        assert!(repo
            .find_by_id_and_recipient(batch[0].id, owner)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_all_by_recipient() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);
        let recipient_id = Uuid::new_v4();

        let batch = vec![
            notification(recipient_id, "2026-01-01T10:00:00+00:00"),
            notification(recipient_id, "2026-01-01T11:00:00+00:00"),
        ];
        repo.save_all(&batch).await.unwrap();

        assert_eq!(repo.delete_all_by_recipient(recipient_id).await.unwrap(), 2);
        // Zero matches is not an error.
        assert_eq!(repo.delete_all_by_recipient(recipient_id).await.unwrap(), 0);
    }
}

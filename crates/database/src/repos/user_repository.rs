//! User directory repository.
//!
//! The user directory is owned by an external collaborator; the core reads
//! it by id, email, or username and enumerates it for broadcast fan-out.
//! `create` exists for seeding and tests.

use crate::entities::{CreateUserRequest, User};
use crate::repos::uuid_column;
use crate::types::{DirectoryError, DirectoryResult};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Repository for user directory lookups
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> DirectoryResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, role, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, role, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> DirectoryResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, role, created_at, updated_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    /// Enumerate the entire directory.
    ///
    /// Materializes every user in memory; the course-creation broadcast
    /// accepts this as a scaling limitation of the current contract.
    pub async fn find_all(&self) -> DirectoryResult<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, email, username, role, created_at, updated_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_user).collect()
    }

    /// Create a new user
    pub async fn create(&self, request: &CreateUserRequest) -> DirectoryResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: request.email.clone(),
            username: request.username.clone(),
            role: request.role,
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO users (id, email, username, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(user.role.to_string())
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        Ok(user)
    }
}

fn row_to_user(row: &SqliteRow) -> DirectoryResult<User> {
    Ok(User {
        id: uuid_column(row, "id").map_err(DirectoryError::Database)?,
        email: row
            .try_get("email")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        username: row
            .try_get("username")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        role: crate::entities::UserRole::from(
            row.try_get::<String, _>("role")
                .map_err(|e| DirectoryError::Database(e.to_string()))?
                .as_str(),
        ),
        created_at: row
            .try_get("created_at")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| DirectoryError::Database(e.to_string()))?,
    })
}

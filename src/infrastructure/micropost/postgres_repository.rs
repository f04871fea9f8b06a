//! PostgreSQL micropost repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::micropost::{Micropost, MicropostId, MicropostRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of MicropostRepository
///
/// The `microposts.user_id` column references `users.id` with
/// `ON DELETE CASCADE`, so the database removes a user's posts even when
/// the user row is deleted directly.
#[derive(Debug, Clone)]
pub struct PostgresMicropostRepository {
    pool: PgPool,
}

impl PostgresMicropostRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MicropostRepository for PostgresMicropostRepository {
    async fn get(&self, id: &MicropostId) -> Result<Option<Micropost>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, content, created_at, updated_at
            FROM microposts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get micropost: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_micropost(&row))),
            None => Ok(None),
        }
    }

    async fn create(&self, micropost: Micropost) -> Result<Micropost, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO microposts (id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(micropost.id().as_uuid())
        .bind(micropost.user_id().as_uuid())
        .bind(micropost.content())
        .bind(micropost.created_at())
        .bind(micropost.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Micropost with ID '{}' already exists",
                    micropost.id()
                ))
            } else if msg.contains("foreign key") {
                DomainError::not_found(format!(
                    "User '{}' not found",
                    micropost.user_id()
                ))
            } else {
                DomainError::storage(format!("Failed to create micropost: {}", e))
            }
        })?;

        Ok(micropost)
    }

    async fn delete(&self, id: &MicropostId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM microposts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete micropost: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Micropost>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, content, created_at, updated_at
            FROM microposts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list microposts: {}", e)))?;

        Ok(rows.iter().map(row_to_micropost).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM microposts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count microposts: {}", e)))?;

        Ok(count as usize)
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM microposts WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to count user's microposts: {}", e))
                })?;

        Ok(count as usize)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM microposts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete user's microposts: {}", e))
            })?;

        Ok(result.rows_affected() as usize)
    }
}

fn row_to_micropost(row: &sqlx::postgres::PgRow) -> Micropost {
    let id: Uuid = row.get("id");
    let user_id: Uuid = row.get("user_id");
    let content: String = row.get("content");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Micropost::from_parts(
        MicropostId::from_uuid(id),
        UserId::from_uuid(user_id),
        content,
        created_at,
        updated_at,
    )
}

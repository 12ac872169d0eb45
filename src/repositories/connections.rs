use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::oauth::LinkProvider;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewConnection {
    pub user_id: Uuid,
    pub provider: LinkProvider,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A linked account as shown to its owner; tokens never leave the database.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConnectionSummary {
    pub provider: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ConnectionRepository;

impl ConnectionRepository {
    /// Store provider tokens, replacing any earlier link for the same provider.
    pub async fn upsert(pool: &DbPool, conn: &NewConnection) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_connections (
                user_id, provider, access_token, refresh_token, expires_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id, provider) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
            "#,
        )
        .bind(conn.user_id)
        .bind(conn.provider.as_str())
        .bind(&conn.access_token)
        .bind(&conn.refresh_token)
        .bind(conn.expires_at)
        .execute(pool)
        .await
        .map_err(AppError::Db)?;

        Ok(())
    }

    pub async fn list_for_user(pool: &DbPool, user_id: Uuid) -> Result<Vec<ConnectionSummary>> {
        let connections = sqlx::query_as::<_, ConnectionSummary>(
            r#"
            SELECT provider, expires_at, created_at, updated_at
            FROM user_connections
            WHERE user_id = $1
            ORDER BY provider
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(connections)
    }
}

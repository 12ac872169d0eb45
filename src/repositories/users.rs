use crate::db::DbPool;
use crate::error::AppError;
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

/// Columns shown in the "recent users" listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentUser {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub top_genre: Option<String>,
    pub share_card_count: i32,
    pub plus_plan: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
}

impl<'r> FromRow<'r, PgRow> for RecentUser {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            display_name: row.try_get("display_name")?,
            email: row.try_get("email")?,
            top_genre: row.try_get("top_genre")?,
            share_card_count: row.try_get("share_card_count")?,
            plus_plan: row.try_get("plus_plan")?,
        })
    }
}

pub struct UserRepository;

impl UserRepository {
    /// Newest sign-ups first. The raw error is kept so callers can report the SQLSTATE.
    pub async fn recent(pool: &DbPool, limit: i64) -> Result<Vec<RecentUser>, sqlx::Error> {
        sqlx::query_as::<_, RecentUser>(
            r#"
            SELECT id, display_name, email, top_genre, share_card_count, plus_plan
            FROM "Vynce_User"
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// A few rows in table order, used as a reachability check.
    pub async fn sample(pool: &DbPool, limit: i64) -> Result<Vec<UserSummary>, AppError> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, display_name, email
            FROM "Vynce_User"
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(AppError::Db)
    }
}

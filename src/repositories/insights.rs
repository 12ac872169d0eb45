use crate::db::DbPool;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// One generated insight card. `insight_data` is free-form per card type.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InsightCard {
    pub id: Uuid,
    pub insight_type: String,
    pub insight_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct InsightRepository;

impl InsightRepository {
    pub async fn list_for_user(pool: &DbPool, user_id: Uuid, limit: i64) -> Result<Vec<InsightCard>> {
        let cards = sqlx::query_as::<_, InsightCard>(
            r#"
            SELECT id, insight_type, insight_data, created_at, updated_at
            FROM user_insights
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(cards)
    }
}

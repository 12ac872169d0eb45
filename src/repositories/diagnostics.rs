use crate::db::DbPool;
use serde_json::Value;

/// Raw checks used by the status endpoints. Errors are returned untouched so
/// callers can inspect SQLSTATE codes.
pub struct DiagnosticsRepository;

impl DiagnosticsRepository {
    pub async fn check_health_table(pool: &DbPool) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT id FROM health_check LIMIT 1")
            .fetch_optional(pool)
            .await?;
        Ok(())
    }

    pub async fn list_public_tables(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT tablename::text
            FROM pg_catalog.pg_tables
            WHERE schemaname = 'public'
            ORDER BY tablename
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Calls the project's `get_tables()` helper function, if it was installed.
    pub async fn call_get_tables(pool: &DbPool) -> Result<Value, sqlx::Error> {
        sqlx::query_scalar("SELECT COALESCE(jsonb_agg(to_jsonb(t)), '[]'::jsonb) FROM get_tables() t")
            .fetch_one(pool)
            .await
    }
}

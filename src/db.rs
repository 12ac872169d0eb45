use crate::config::DbConfig;
use crate::error::AppError;
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;

pub type DbPool = Pool<Postgres>;

/// SQLSTATE for "relation does not exist".
pub const UNDEFINED_TABLE: &str = "42P01";

pub async fn connect(cfg: &DbConfig) -> Result<DbPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.url)
        .await?;
    Ok(pool)
}

/// Build a pool that connects on first use.
pub fn connect_lazy(cfg: &DbConfig) -> Result<DbPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&cfg.url)?;
    Ok(pool)
}

/// Database error as reported in diagnostic JSON payloads.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DbErrorInfo {
    pub message: String,
    pub code: Option<String>,
}

impl From<&sqlx::Error> for DbErrorInfo {
    fn from(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self {
                message: db.message().to_string(),
                code: db.code().map(|c| c.into_owned()),
            },
            other => Self {
                message: other.to_string(),
                code: None,
            },
        }
    }
}

pub fn error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

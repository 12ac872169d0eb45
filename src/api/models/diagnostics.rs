use crate::db::{DbErrorInfo, UNDEFINED_TABLE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Checking,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    pub timestamp: DateTime<Utc>,
    pub environment: Option<String>,
    pub checks: Checks,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checks {
    pub env: EnvCheck,
    pub connection: ServiceCheck,
    pub tables: TablesCheck,
    pub auth_service: ServiceCheck,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvCheck {
    pub supabase_url: bool,
    pub supabase_anon_key: bool,
    pub supabase_service_key: bool,
}

#[derive(Debug, Serialize)]
pub struct ServiceCheck {
    pub status: CheckStatus,
    pub error: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablesCheck {
    pub status: CheckStatus,
    pub found_tables: Vec<String>,
    pub error: Option<Value>,
}

impl ServiceCheck {
    fn pending() -> Self {
        Self {
            status: CheckStatus::Checking,
            error: None,
        }
    }
}

impl DiagnosticsReport {
    pub fn new(environment: Option<String>, env: EnvCheck) -> Self {
        Self {
            timestamp: Utc::now(),
            environment,
            checks: Checks {
                env,
                connection: ServiceCheck::pending(),
                tables: TablesCheck {
                    status: CheckStatus::Checking,
                    found_tables: Vec::new(),
                    error: None,
                },
                auth_service: ServiceCheck::pending(),
            },
        }
    }

    /// A missing `health_check` table still proves the database answered.
    pub fn record_health_check(&mut self, result: Result<(), DbErrorInfo>) {
        match result {
            Ok(()) => {
                self.checks.connection.status = CheckStatus::Success;
                self.checks.tables.status = CheckStatus::Success;
                self.checks.tables.found_tables.push("health_check".to_string());
            }
            Err(err) if err.code.as_deref() == Some(UNDEFINED_TABLE) => {
                self.checks.connection.status = CheckStatus::Success;
                self.checks.tables.status = CheckStatus::Warning;
                self.checks.tables.error = Some(json!("health_check table not found"));
            }
            Err(err) => {
                self.checks.connection.status = CheckStatus::Error;
                self.checks.connection.error = Some(db_error_json(&err));
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.checks.connection.status == CheckStatus::Success
    }

    pub fn record_auth_check(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.checks.auth_service.status = CheckStatus::Success,
            Err(message) => {
                self.checks.auth_service.status = CheckStatus::Error;
                self.checks.auth_service.error = Some(json!({ "message": message }));
            }
        }
    }
}

pub fn db_error_json(err: &DbErrorInfo) -> Value {
    json!({
        "message": err.message,
        "code": err.code,
    })
}

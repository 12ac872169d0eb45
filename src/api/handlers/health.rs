use super::AppState;
use crate::api::models::diagnostics::{DiagnosticsReport, EnvCheck};
use crate::db::DbErrorInfo;
use crate::repositories::DiagnosticsRepository;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, info};

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Step-by-step report on configuration, database and auth service reachability.
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    let supabase = &state.config.supabase;
    let mut report = DiagnosticsReport::new(
        state.config.api.environment.clone(),
        EnvCheck {
            supabase_url: supabase.has_url(),
            supabase_anon_key: supabase.has_anon_key(),
            supabase_service_key: supabase.has_service_role_key(),
        },
    );

    let table_check = DiagnosticsRepository::check_health_table(&state.pool)
        .await
        .map_err(|e| DbErrorInfo::from(&e));
    report.record_health_check(table_check);

    if report.is_connected() {
        // Supplementary; failure leaves the health check result in place
        match DiagnosticsRepository::list_public_tables(&state.pool).await {
            Ok(tables) => report.checks.tables.found_tables = tables,
            Err(e) => error!("Failed to list tables: {}", e),
        }
    }

    let auth = match &state.gotrue {
        Some(gotrue) => gotrue.health().await.map_err(|e| e.to_string()),
        None => Err("Supabase auth is not configured".to_string()),
    };
    report.record_auth_check(auth);

    info!(
        connection = ?report.checks.connection.status,
        auth_service = ?report.checks.auth_service.status,
        "Diagnostics completed"
    );

    Json(report)
}

use super::AppState;
use crate::api::models::diagnostics::db_error_json;
use crate::db::DbErrorInfo;
use crate::error::AppError;
use crate::repositories::{DiagnosticsRepository, UserRepository};
use axum::{extract::State, Json};
use serde_json::{json, Value};

fn presence(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "not set"
    }
}

pub(crate) fn app_error_json(err: &AppError) -> Value {
    match err {
        AppError::Db(e) => db_error_json(&DbErrorInfo::from(e)),
        other => json!({ "message": other.to_string() }),
    }
}

/// Configuration presence plus raw results of two representative queries.
pub async fn debug(State(state): State<AppState>) -> Json<Value> {
    let supabase = &state.config.supabase;
    let env_info = json!({
        "SUPABASE_URL": presence(supabase.has_url()),
        "SUPABASE_SERVICE_ROLE_KEY": presence(supabase.has_service_role_key()),
        "SUPABASE_ANON_KEY": presence(supabase.has_anon_key()),
    });

    let vynce_user = match UserRepository::sample(&state.pool, 1).await {
        Ok(users) => json!({
            "found": !users.is_empty(),
            "data": users,
            "error": null,
        }),
        Err(e) => json!({
            "found": false,
            "data": null,
            "error": app_error_json(&e),
        }),
    };

    let tables = match DiagnosticsRepository::call_get_tables(&state.pool).await {
        Ok(data) => json!({ "data": data, "error": null }),
        Err(e) => json!({
            "data": null,
            "error": { "message": format!("RPC get_tables not available: {}", e) },
        }),
    };

    Json(json!({
        "status": "success",
        "envInfo": env_info,
        "vynceUser": vynce_user,
        "tables": tables,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_labels() {
        assert_eq!(presence(true), "set");
        assert_eq!(presence(false), "not set");
    }

    #[test]
    fn test_app_error_json_for_non_database_errors() {
        let value = app_error_json(&AppError::Config("missing url".into()));
        assert_eq!(value, json!({ "message": "Config error: missing url" }));

        let value = app_error_json(&AppError::Db(sqlx::Error::RowNotFound));
        assert!(value["code"].is_null());
    }
}

use super::debug::app_error_json;
use super::AppState;
use crate::repositories::UserRepository;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{info, warn};

fn presence(set: bool) -> &'static str {
    if set {
        "Set ✓"
    } else {
        "Missing ✗"
    }
}

/// Connection test against the `Vynce_User` table.
pub async fn supabase_status(State(state): State<AppState>) -> Json<Value> {
    info!("Checking Supabase connection status");

    let result = UserRepository::sample(&state.pool, 3).await;
    let connected = result.is_ok();

    let users = match &result {
        Ok(rows) => json!({ "error": null, "data": rows, "count": rows.len() }),
        Err(e) => {
            warn!("Vynce_User query failed: {}", e);
            json!({ "error": app_error_json(e), "data": null, "count": 0 })
        }
    };

    let names: Vec<&str> = if connected { vec!["Vynce_User"] } else { vec![] };

    Json(json!({
        "status": if connected { "success" } else { "error" },
        "connected": connected,
        "tables": {
            "count": names.len(),
            "names": names,
            "vynceUserExists": connected,
        },
        "users": users,
        "env": {
            "url": presence(state.config.supabase.has_url()),
            "key": presence(state.config.supabase.has_anon_key()),
        },
    }))
}

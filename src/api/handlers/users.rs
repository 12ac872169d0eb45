use super::AppState;
use crate::api::models::dashboard::RecentUsersResponse;
use crate::db::{error_code, DbErrorInfo};
use crate::repositories::UserRepository;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, info};

pub const RECENT_USER_LIMIT: i64 = 10;

pub async fn recent(State(state): State<AppState>) -> Response {
    match UserRepository::recent(&state.pool, RECENT_USER_LIMIT).await {
        Ok(users) => {
            info!(count = users.len(), "Fetched recent users");
            Json(RecentUsersResponse { users }).into_response()
        }
        Err(e) => {
            error!("Recent users query failed: {:?}", e);
            let info = DbErrorInfo::from(&e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "users": [],
                    "error": format!("Database error: {}", info.message),
                    "code": error_code(&e),
                })),
            )
                .into_response()
        }
    }
}

use crate::api::handlers::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::debug;

/// Gate for signed-in users; unauthenticated callers are told where to sign in.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.sessions.resolve(request.headers()).await {
        Some(user) => {
            debug!("Authenticated session: user={}", user.id);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            debug!("Rejecting request without a valid session");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Not authenticated",
                    "redirect": "/sign-in",
                })),
            )
                .into_response()
        }
    }
}

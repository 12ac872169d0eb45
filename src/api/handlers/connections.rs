use super::{redirect_with_cookies, AppState};
use crate::auth::cookies;
use crate::error::AppError;
use crate::oauth::{new_state, provider_for, LinkProvider, OAuthProvider, STATE_MAX_AGE};
use crate::repositories::{ConnectionRepository, NewConnection};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct LinkParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub async fn spotify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LinkParams>,
) -> Response {
    link(LinkProvider::Spotify, &state, &headers, params).await
}

pub async fn instagram(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LinkParams>,
) -> Response {
    link(LinkProvider::Instagram, &state, &headers, params).await
}

/// Both legs of the authorization-code flow: start when there is no code,
/// complete when the provider sends the browser back with one.
async fn link(
    kind: LinkProvider,
    state: &AppState,
    headers: &HeaderMap,
    params: LinkParams,
) -> Response {
    let dashboard = format!("{}/dashboard", state.origin(headers));
    let state_cookie = cookies::oauth_state_cookie(kind.as_str());

    let Some(provider) = provider_for(kind, &state.config) else {
        let message = format!("{} is not configured", kind.display_name());
        error!("Cannot link {}: {}", kind, message);
        return redirect_with_cookies(&failure_url(&dashboard, kind, &message), Vec::new());
    };

    if let Some(reason) = params.error_description.or(params.error) {
        error!("{} authorization denied: {}", kind, reason);
        return redirect_with_cookies(
            &failure_url(&dashboard, kind, &reason),
            vec![cookies::remove(&state_cookie)],
        );
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        let nonce = new_state();
        return match provider.authorization_url(&nonce) {
            Ok(url) => {
                info!("Starting {} link flow", kind);
                redirect_with_cookies(
                    url.as_str(),
                    vec![cookies::set(&state_cookie, &nonce, Some(STATE_MAX_AGE))],
                )
            }
            Err(e) => {
                error!("Failed to build {} authorization URL: {}", kind, e);
                redirect_with_cookies(&failure_url(&dashboard, kind, &e.to_string()), Vec::new())
            }
        };
    };

    let expected = cookies::get(headers, &state_cookie);
    let clear_state = vec![cookies::remove(&state_cookie)];

    match complete_link(provider.as_ref(), state, headers, &code, params.state, expected).await {
        Ok(()) => {
            info!("Linked {} account", kind);
            redirect_with_cookies(&success_url(&dashboard, kind), clear_state)
        }
        Err(e) => {
            error!("{} link failed: {}", kind, e);
            redirect_with_cookies(&failure_url(&dashboard, kind, &e.to_string()), clear_state)
        }
    }
}

async fn complete_link(
    provider: &dyn OAuthProvider,
    state: &AppState,
    headers: &HeaderMap,
    code: &str,
    returned_state: Option<String>,
    expected_state: Option<String>,
) -> Result<(), AppError> {
    match (returned_state, expected_state) {
        (Some(returned), Some(expected)) if returned == expected => {}
        _ => return Err(AppError::OAuth("Invalid OAuth state".to_string())),
    }

    let user = state
        .sessions
        .resolve(headers)
        .await
        .ok_or_else(|| AppError::OAuth("You must be signed in to connect an account".to_string()))?;

    let grant = provider.exchange_code(&state.http, code).await?;

    ConnectionRepository::upsert(
        &state.pool,
        &NewConnection {
            user_id: user.id,
            provider: provider.kind(),
            expires_at: grant.expires_at(Utc::now()),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
        },
    )
    .await
}

fn success_url(dashboard: &str, kind: LinkProvider) -> String {
    format!("{}?connection={}&status=success", dashboard, kind)
}

fn failure_url(dashboard: &str, kind: LinkProvider, message: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    format!(
        "{}?connection={}&status=error&message={}",
        dashboard, kind, encoded
    )
}

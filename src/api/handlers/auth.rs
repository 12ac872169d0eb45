use super::{redirect_with_cookies, with_cookies, AppState};
use crate::api::models::auth::{
    validate_email, validate_password, CallbackParams, ForgotPasswordPayload, MessageResponse,
    SignInPayload, SignUpPayload, SignUpResponse, UserEnvelope, UserResponse,
};
use crate::auth::gotrue::SignUpRequest;
use crate::auth::{cookies, pkce, session::extract_access_token};
use crate::error::{AppError, Result};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, info, warn};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Landing point for GoTrue email links. Always ends on the dashboard.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let target = format!("{}/dashboard", state.origin(&headers));

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return redirect_with_cookies(&target, Vec::new());
    };

    let Some(verifier) = cookies::get(&headers, cookies::CODE_VERIFIER) else {
        warn!("Auth callback without a code verifier cookie");
        return redirect_with_cookies(&target, Vec::new());
    };

    let exchanged = match state.gotrue() {
        Ok(gotrue) => gotrue.exchange_code_for_session(&code, &verifier).await,
        Err(e) => Err(e),
    };

    match exchanged {
        Ok(session) => {
            info!("Exchanged auth code for session: user={}", session.user.id);
            let mut set = cookies::session(
                &session.access_token,
                &session.refresh_token,
                session.expires_in,
            );
            set.push(cookies::remove(cookies::CODE_VERIFIER));
            redirect_with_cookies(&target, set)
        }
        Err(e) => {
            error!("Auth code exchange failed: {}", e);
            redirect_with_cookies(&target, Vec::new())
        }
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SignUpPayload>,
) -> Result<Response> {
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    let gotrue = state.gotrue()?;

    let verifier = pkce::generate_code_verifier();
    let challenge = pkce::code_challenge(&verifier);
    let redirect_to = format!("{}/api/auth/callback", state.origin(&headers));

    let outcome = gotrue
        .sign_up(SignUpRequest {
            email,
            password: &payload.password,
            full_name: payload.name.trim(),
            code_challenge: &challenge,
            email_redirect_to: &redirect_to,
        })
        .await
        .map_err(|e| {
            warn!("Sign-up rejected for {}: {}", email, e);
            e
        })?;

    info!("Signed up user {}", outcome.user.id);

    let mut set = vec![cookies::set(cookies::CODE_VERIFIER, &verifier, None)];
    if let Some(session) = &outcome.session {
        set.extend(cookies::session(
            &session.access_token,
            &session.refresh_token,
            session.expires_in,
        ));
    }

    let body = SignUpResponse {
        user: UserResponse::from(&outcome.user),
        confirmation_required: outcome.session.is_none(),
    };

    Ok(with_cookies(
        (StatusCode::CREATED, Json(body)).into_response(),
        set,
    ))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> Result<Response> {
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    let gotrue = state.gotrue()?;

    let session = gotrue
        .sign_in_with_password(email, &payload.password)
        .await
        .map_err(|e| {
            warn!("Sign-in failed for {}: {}", email, e);
            match e {
                AppError::AuthStatus(_) => AppError::Auth(INVALID_CREDENTIALS.to_string()),
                other => other,
            }
        })?;

    info!("Signed in user {}", session.user.id);

    let body = UserEnvelope {
        user: UserResponse::from(&session.user),
    };
    Ok(with_cookies(
        Json(body).into_response(),
        cookies::session(
            &session.access_token,
            &session.refresh_token,
            session.expires_in,
        ),
    ))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<MessageResponse>> {
    let email = validate_email(&payload.email)?;
    let gotrue = state.gotrue()?;

    let redirect_to = format!("{}/reset-password", state.origin(&headers));
    gotrue.recover(email, &redirect_to).await?;

    info!("Password reset requested for {}", email);

    Ok(Json(MessageResponse {
        message: format!(
            "Password reset link sent to {}. Please check your inbox.",
            email
        ),
    }))
}

/// Clears session cookies; GoTrue revocation is best effort.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let (Some(token), Some(gotrue)) = (extract_access_token(&headers), &state.gotrue) {
        if let Err(e) = gotrue.logout(&token).await {
            warn!("GoTrue logout failed: {}", e);
        }
    }

    with_cookies(
        Json(json!({ "status": "signed_out" })).into_response(),
        cookies::clear_session(),
    )
}

pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserEnvelope>> {
    let user = state
        .sessions
        .resolve(&headers)
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(user),
    }))
}

pub mod auth;
pub mod connections;
pub mod dashboard;
pub mod debug;
pub mod health;
pub mod status;
pub mod users;

use crate::auth::{GoTrueClient, JwtValidator, SessionVerifier};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub sessions: SessionVerifier,
    pub gotrue: Option<GoTrueClient>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: Config,
        http: reqwest::Client,
        jwks: Option<JwtValidator>,
    ) -> Self {
        let gotrue = GoTrueClient::from_config(http.clone(), &config.supabase);
        let sessions =
            SessionVerifier::new(jwks, config.supabase.jwt_secret.clone(), gotrue.clone());

        Self {
            pool,
            config: Arc::new(config),
            http,
            sessions,
            gotrue,
        }
    }

    pub fn gotrue(&self) -> Result<&GoTrueClient> {
        self.gotrue
            .as_ref()
            .ok_or_else(|| AppError::Config("Supabase auth is not configured".to_string()))
    }

    /// Origin of the web app that redirects should land on.
    pub fn origin(&self, headers: &HeaderMap) -> String {
        if let Some(url) = self.config.api.public_url.as_deref().filter(|u| !u.is_empty()) {
            return url.trim_end_matches('/').to_string();
        }

        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("http");

        format!("{}://{}", proto, host)
    }
}

/// Attach `Set-Cookie` headers to a response.
pub fn with_cookies(mut response: Response, cookies: Vec<String>) -> Response {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Dropping unencodable cookie: {}", e),
        }
    }
    response
}

pub fn redirect_with_cookies(location: &str, cookies: Vec<String>) -> Response {
    with_cookies(Redirect::temporary(location).into_response(), cookies)
}

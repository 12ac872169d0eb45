use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Third-party accounts a Vynce user can link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkProvider {
    Spotify,
    Instagram,
}

impl LinkProvider {
    /// Value stored in `user_connections.provider`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkProvider::Spotify => "spotify",
            LinkProvider::Instagram => "instagram",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LinkProvider::Spotify => "Spotify",
            LinkProvider::Instagram => "Instagram",
        }
    }
}

impl fmt::Display for LinkProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokens obtained from a completed authorization-code exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenGrant {
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        // Out-of-range lifetimes are stored as an unknown expiry
        self.expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
    }
}

/// Raw token endpoint payload; providers disagree on which fields are present.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub error_message: Option<String>,
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn kind(&self) -> LinkProvider;

    /// Where to send the browser to start the flow.
    fn authorization_url(&self, state: &str) -> Result<Url, AppError>;

    async fn exchange_code(
        &self,
        http: &reqwest::Client,
        code: &str,
    ) -> Result<TokenGrant, AppError>;
}

pub(crate) fn parse_endpoint(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::Config(format!("invalid OAuth endpoint {}: {}", raw, e)))
}

use super::provider::{parse_endpoint, LinkProvider, OAuthProvider, RawTokenResponse, TokenGrant};
use crate::config::ProviderConfig;
use crate::error::AppError;
use async_trait::async_trait;
use tracing::warn;
use url::Url;

pub const AUTHORIZE_URL: &str = "https://api.instagram.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
pub const GRAPH_URL: &str = "https://graph.instagram.com";
pub const SCOPES: &str = "user_profile,user_media";

/// Instagram Basic Display: a short-lived code grant traded for a long-lived token.
pub struct InstagramProvider {
    config: ProviderConfig,
}

impl InstagramProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn long_lived_url(&self, short_lived_token: &str) -> Result<Url, AppError> {
        let base = self.config.graph_url.as_deref().unwrap_or(GRAPH_URL);
        let mut url = parse_endpoint(&format!("{}/access_token", base.trim_end_matches('/')))?;
        url.query_pairs_mut()
            .append_pair("grant_type", "ig_exchange_token")
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("access_token", short_lived_token);
        Ok(url)
    }
}

#[async_trait]
impl OAuthProvider for InstagramProvider {
    fn kind(&self) -> LinkProvider {
        LinkProvider::Instagram
    }

    fn authorization_url(&self, state: &str) -> Result<Url, AppError> {
        let mut url = parse_endpoint(self.config.authorize_url.as_deref().unwrap_or(AUTHORIZE_URL))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", SCOPES)
            .append_pair("response_type", "code")
            .append_pair("state", state);
        Ok(url)
    }

    async fn exchange_code(
        &self,
        http: &reqwest::Client,
        code: &str,
    ) -> Result<TokenGrant, AppError> {
        let token_url = self.config.token_url.as_deref().unwrap_or(TOKEN_URL);
        let short_lived: RawTokenResponse = http
            .post(token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?
            .json()
            .await?;

        let short_lived_token = require_token(short_lived, "Failed to get Instagram access token")?;

        let long_lived: RawTokenResponse = http
            .get(self.long_lived_url(&short_lived_token)?)
            .send()
            .await?
            .json()
            .await?;

        let expires_in = long_lived.expires_in;
        let access_token =
            require_token(long_lived, "Failed to get long-lived Instagram access token")?;

        Ok(TokenGrant {
            access_token,
            refresh_token: None,
            expires_in,
        })
    }
}

/// Instagram puts its reason in `error_message`; the caller only sees `failure`.
fn require_token(raw: RawTokenResponse, failure: &str) -> Result<String, AppError> {
    match raw.access_token {
        Some(token) => Ok(token),
        None => {
            let detail = raw
                .error_message
                .or(raw.error_description)
                .or(raw.error)
                .unwrap_or_else(|| "no access_token in response".to_string());
            warn!("{}: {}", failure, detail);
            Err(AppError::OAuth(failure.to_string()))
        }
    }
}

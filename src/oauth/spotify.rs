use super::provider::{parse_endpoint, LinkProvider, OAuthProvider, RawTokenResponse, TokenGrant};
use crate::config::ProviderConfig;
use crate::error::AppError;
use async_trait::async_trait;
use url::Url;

pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SCOPES: &str = "user-read-private user-read-email user-top-read user-read-recently-played";

pub struct SpotifyProvider {
    config: ProviderConfig,
}

impl SpotifyProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn token_url(&self) -> &str {
        self.config.token_url.as_deref().unwrap_or(TOKEN_URL)
    }
}

#[async_trait]
impl OAuthProvider for SpotifyProvider {
    fn kind(&self) -> LinkProvider {
        LinkProvider::Spotify
    }

    fn authorization_url(&self, state: &str) -> Result<Url, AppError> {
        let mut url = parse_endpoint(self.config.authorize_url.as_deref().unwrap_or(AUTHORIZE_URL))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", SCOPES)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state);
        Ok(url)
    }

    async fn exchange_code(
        &self,
        http: &reqwest::Client,
        code: &str,
    ) -> Result<TokenGrant, AppError> {
        let response = http
            .post(self.token_url())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        // Spotify reports failures in the JSON body alongside a 4xx status
        let raw: RawTokenResponse = response.json().await?;
        grant_from_response(raw)
    }
}

fn grant_from_response(raw: RawTokenResponse) -> Result<TokenGrant, AppError> {
    if raw.error.is_some() {
        return Err(AppError::OAuth(
            raw.error_description
                .unwrap_or_else(|| "Failed to get Spotify access token".to_string()),
        ));
    }

    let access_token = raw
        .access_token
        .ok_or_else(|| AppError::OAuth("Failed to get Spotify access token".to_string()))?;

    Ok(TokenGrant {
        access_token,
        refresh_token: raw.refresh_token,
        expires_in: raw.expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn provider() -> SpotifyProvider {
        SpotifyProvider::new(ProviderConfig {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:8080/api/auth/spotify".into(),
            authorize_url: None,
            token_url: None,
            graph_url: None,
        })
    }

    #[test]
    fn test_authorization_url() {
        let url = provider().authorization_url("state-abc").unwrap();
        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["scope"], SCOPES);
        assert_eq!(params["redirect_uri"], "http://localhost:8080/api/auth/spotify");
        assert_eq!(params["state"], "state-abc");
    }

    #[test]
    fn test_grant_from_successful_response() {
        let raw: RawTokenResponse = serde_json::from_str(
            r#"{"access_token":"at","token_type":"Bearer","scope":"user-top-read","expires_in":3600,"refresh_token":"rt"}"#,
        )
        .unwrap();

        let grant = grant_from_response(raw).unwrap();
        assert_eq!(
            grant,
            TokenGrant {
                access_token: "at".into(),
                refresh_token: Some("rt".into()),
                expires_in: Some(3600),
            }
        );
    }

    #[test]
    fn test_grant_from_error_response_uses_description() {
        let raw: RawTokenResponse = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#,
        )
        .unwrap();

        let err = grant_from_response(raw).unwrap_err();
        assert_eq!(err.to_string(), "Invalid authorization code");
    }

    #[test]
    fn test_grant_from_error_without_description() {
        let raw: RawTokenResponse = serde_json::from_str(r#"{"error":"server_error"}"#).unwrap();
        let err = grant_from_response(raw).unwrap_err();
        assert_eq!(err.to_string(), "Failed to get Spotify access token");
    }
}

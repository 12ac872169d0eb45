use crate::config::SupabaseConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Thin REST client for the Supabase auth service (GoTrue).
#[derive(Clone)]
pub struct GoTrueClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoTrueUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: GoTrueUser,
}

#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: GoTrueUser,
    /// Present when the project auto-confirms new accounts.
    pub session: Option<Session>,
}

#[derive(Debug, Clone)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub code_challenge: &'a str,
    pub email_redirect_to: &'a str,
}

impl GoTrueClient {
    pub fn new(http: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Returns `None` unless both the project URL and anon key are configured.
    pub fn from_config(http: reqwest::Client, cfg: &SupabaseConfig) -> Option<Self> {
        if !cfg.has_url() || !cfg.has_anon_key() {
            return None;
        }
        let url = cfg.url.as_deref()?;
        let key = cfg.anon_key.as_deref()?;
        Some(Self::new(http, url, key))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    pub async fn sign_up(&self, req: SignUpRequest<'_>) -> Result<SignUpOutcome, AppError> {
        let response = self
            .http
            .post(self.endpoint("/signup"))
            .query(&[("redirect_to", req.email_redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": req.email,
                "password": req.password,
                "data": { "full_name": req.full_name },
                "code_challenge": req.code_challenge,
                "code_challenge_method": "s256",
            }))
            .send()
            .await?;

        let body: Value = check(response).await?.json().await?;
        parse_sign_up(body)
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let response = self
            .http
            .post(self.endpoint("/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.endpoint("/recover"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    pub async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, AppError> {
        let response = self
            .http
            .post(self.endpoint("/token"))
            .query(&[("grant_type", "pkce")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "auth_code": auth_code, "code_verifier": code_verifier }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn get_user(&self, access_token: &str) -> Result<GoTrueUser, AppError> {
        let response = self
            .http
            .get(self.endpoint("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn logout(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.endpoint("/logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<(), AppError> {
        let response = self
            .http
            .get(self.endpoint("/health"))
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    Err(match error_message(&body) {
        Some(message) => AppError::Auth(message),
        None => AppError::AuthStatus(status),
    })
}

/// GoTrue reports errors under several keys depending on the endpoint and version.
fn error_message(body: &Value) -> Option<String> {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_sign_up(body: Value) -> Result<SignUpOutcome, AppError> {
    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value(body)?;
        return Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    // Unconfirmed sign-ups return the bare user object
    let user = match body.get("user") {
        Some(user) => serde_json::from_value(user.clone())?,
        None => serde_json::from_value(body)?,
    };
    Ok(SignUpOutcome {
        user,
        session: None,
    })
}

use super::cookies;
use super::gotrue::GoTrueClient;
use super::jwt::{validate_token, JwtValidator};
use axum::http::HeaderMap;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// The signed-in Supabase user behind a request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Resolves access tokens to users, preferring local verification over a GoTrue round trip.
#[derive(Clone, Default)]
pub struct SessionVerifier {
    jwks: Option<JwtValidator>,
    jwt_secret: Option<String>,
    gotrue: Option<GoTrueClient>,
}

impl SessionVerifier {
    pub fn new(
        jwks: Option<JwtValidator>,
        jwt_secret: Option<String>,
        gotrue: Option<GoTrueClient>,
    ) -> Self {
        Self {
            jwks,
            jwt_secret: jwt_secret.filter(|s| !s.is_empty()),
            gotrue,
        }
    }

    pub async fn verify(&self, token: &str) -> Option<SessionUser> {
        let (sub, email) = if let Some(validator) = &self.jwks {
            match validator.validate_token(token).await {
                Ok(claims) => (claims.sub, claims.email),
                Err(e) => {
                    debug!("JWKS validation failed: {:?}", e);
                    return None;
                }
            }
        } else if let Some(secret) = &self.jwt_secret {
            match validate_token(token, secret) {
                Ok(claims) => (claims.sub, claims.email),
                Err(e) => {
                    debug!("JWT validation failed: {}", e);
                    return None;
                }
            }
        } else if let Some(gotrue) = &self.gotrue {
            match gotrue.get_user(token).await {
                Ok(user) => return Some(SessionUser {
                    id: user.id,
                    email: user.email,
                }),
                Err(e) => {
                    debug!("GoTrue rejected access token: {}", e);
                    return None;
                }
            }
        } else {
            debug!("No session verifier configured");
            return None;
        };

        match Uuid::parse_str(&sub) {
            Ok(id) => Some(SessionUser { id, email }),
            Err(_) => {
                debug!("Token subject is not a user id: {}", sub);
                None
            }
        }
    }

    /// Resolve the caller from the request headers, if they carry a valid session.
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = extract_access_token(headers)?;
        self.verify(&token).await
    }
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    match auth_header {
        Some(header) if header.starts_with("Bearer ") => Some(&header[7..]),
        _ => None,
    }
}

/// Bearer token first, then the session cookie set at sign-in.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    extract_bearer_token(auth_header)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| cookies::get(headers, cookies::ACCESS_TOKEN))
        .filter(|t| !t.is_empty())
}

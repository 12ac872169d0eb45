use alcoholic_jwt::{validate, Validation as JwksValidation, ValidationError, JWKS};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Audience GoTrue stamps on access tokens of signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,         // GoTrue user id (uuid)
    pub exp: usize,          // expiration time
    pub iat: Option<usize>,  // issued at
    pub iss: Option<String>, // issuer
    pub aud: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

// JWKS-based validator for asymmetrically signed Supabase tokens
#[derive(Clone)]
pub struct JwtValidator {
    jwks: Arc<RwLock<JWKS>>,
    issuer: String,
}

impl JwtValidator {
    pub async fn new(
        http: &reqwest::Client,
        jwks_url: &str,
        issuer: String,
    ) -> Result<Self, reqwest::Error> {
        let jwks = fetch_jwks(http, jwks_url).await?;
        Ok(Self::from_jwks(jwks, issuer))
    }

    pub fn from_jwks(jwks: JWKS, issuer: String) -> Self {
        Self {
            jwks: Arc::new(RwLock::new(jwks)),
            issuer,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, ValidationError> {
        let jwks = self.jwks.read().await;
        let validations = vec![
            JwksValidation::Issuer(self.issuer.clone()),
            JwksValidation::SubjectPresent,
            JwksValidation::NotExpired,
        ];

        let kid = alcoholic_jwt::token_kid(token)
            .map_err(|_| ValidationError::InvalidSignature)?
            .ok_or(ValidationError::InvalidSignature)?;

        let jwk = jwks.find(&kid).ok_or(ValidationError::InvalidSignature)?;

        let valid_jwt = validate(token, jwk, validations)?;

        serde_json::from_value(valid_jwt.claims).map_err(|_| ValidationError::InvalidSignature)
    }
}

async fn fetch_jwks(http: &reqwest::Client, url: &str) -> Result<JWKS, reqwest::Error> {
    http.get(url).send().await?.error_for_status()?.json().await
}

/// Mint an HS256 access token the way GoTrue does for a signed-in user.
pub fn create_token(
    user_id: &str,
    email: Option<&str>,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiry_hours as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.timestamp() as usize,
        iat: Some(now.timestamp() as usize),
        iss: None,
        aud: Some(AUTHENTICATED_AUDIENCE.to_string()),
        email: email.map(str::to_string),
        role: Some(AUTHENTICATED_AUDIENCE.to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to create token: {}", e))
}

/// Validate an HS256 token signed with the project's JWT secret.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::default();
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[test]
    fn test_create_and_validate_token() {
        let secret = "test-secret-key";

        let token = create_token(USER_ID, Some("test@example.com"), secret, 24).unwrap();
        assert!(!token.is_empty());

        let claims = validate_token(&token, secret).unwrap();
        assert_eq!(claims.sub, USER_ID);
        assert_eq!(claims.email.as_deref(), Some("test@example.com"));
        assert_eq!(claims.aud.as_deref(), Some(AUTHENTICATED_AUDIENCE));
    }

    #[test]
    fn test_validate_token_wrong_secret() {
        let token = create_token(USER_ID, None, "test-secret-key", 24).unwrap();
        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_token_expired() {
        let secret = "test-secret-key";
        let now = Utc::now();

        let claims = Claims {
            sub: USER_ID.to_string(),
            exp: (now - Duration::hours(1)).timestamp() as usize,
            iat: Some((now - Duration::hours(2)).timestamp() as usize),
            iss: None,
            aud: Some(AUTHENTICATED_AUDIENCE.to_string()),
            email: None,
            role: None,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap();

        assert!(validate_token(&token, secret).is_err());
    }

    #[test]
    fn test_validate_token_rejects_anon_audience() {
        let secret = "test-secret-key";
        let claims = Claims {
            sub: USER_ID.to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            iat: None,
            iss: None,
            aud: Some("anon".to_string()),
            email: None,
            role: Some("anon".to_string()),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap();

        assert!(validate_token(&token, secret).is_err());
    }

    #[test]
    fn test_validate_token_malformed() {
        let secret = "test-secret-key";

        assert!(validate_token("not.a.valid.token", secret).is_err());
        assert!(validate_token("", secret).is_err());
        assert!(validate_token(
            "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ0ZXN0In0",
            secret
        )
        .is_err());
    }

    #[test]
    fn test_token_claims_include_timestamps() {
        let secret = "test-secret-key";
        let token = create_token(USER_ID, None, secret, 1).unwrap();
        let claims = validate_token(&token, secret).unwrap();

        let iat = claims.iat.unwrap();
        assert!(claims.exp > iat);
    }
}

use crate::auth::gotrue::GoTrueUser;
use crate::auth::SessionUser;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SignUpPayload {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordPayload {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: Option<String>,
}

impl From<&GoTrueUser> for UserResponse {
    fn from(user: &GoTrueUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

impl From<SessionUser> for UserResponse {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user: UserResponse,
    /// True when GoTrue sent a confirmation email instead of opening a session.
    pub confirmation_required: bool,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn validate_email(email: &str) -> Result<&str, AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput(
            "A valid email address is required".to_string(),
        ));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_payload_name_is_optional() {
        let payload: SignUpPayload =
            serde_json::from_str(r#"{"email":"a@b.c","password":"secret1"}"#).unwrap();
        assert_eq!(payload.name, "");
        assert_eq!(payload.email, "a@b.c");
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("  user@example.com ").unwrap(), "user@example.com");
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("p@ssw0rd!123").is_ok());
        assert!(matches!(validate_password(""), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_sign_up_response_serialization() {
        let response = SignUpResponse {
            user: UserResponse {
                id: Uuid::nil(),
                email: Some("a@b.c".into()),
            },
            confirmation_required: true,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["email"], "a@b.c");
        assert_eq!(json["confirmation_required"], true);
    }
}

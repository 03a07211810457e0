use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

/// Request body for account creation.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub new_password: String,
}

/// User as exposed over the wire: no hash, wishlist ids inlined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub wishlist: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl SafeUser {
    pub fn from_user(user: User, wishlist: Vec<Uuid>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            is_blocked: user.is_blocked,
            wishlist,
            created_at: user.created_at,
        }
    }
}

/// Plain `{success, message}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: SafeUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: SafeUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Priya".into(),
            email: "priya2025@vitstudent.ac.in".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            is_verified: true,
            is_blocked: false,
            created_at: datetime!(2025-01-15 10:00 UTC),
            updated_at: datetime!(2025-01-15 10:00 UTC),
        }
    }

    #[test]
    fn safe_user_serializes_camel_case_without_hash() {
        let wishlist = vec![Uuid::new_v4()];
        let safe = SafeUser::from_user(sample_user(), wishlist.clone());
        let json = serde_json::to_value(&safe).unwrap();

        assert_eq!(json["isVerified"], true);
        assert_eq!(json["isBlocked"], false);
        assert_eq!(json["role"], "user");
        assert_eq!(json["wishlist"][0], wishlist[0].to_string());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json["createdAt"].as_str().unwrap().starts_with("2025-01-15"));
    }

    #[test]
    fn reset_request_accepts_camel_case_field() {
        let parsed: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"abc","newPassword":"longenough"}"#).unwrap();
        assert_eq!(parsed.token, "abc");
        assert_eq!(parsed.new_password, "longenough");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let parsed: SignupRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.name.is_empty());
        assert!(parsed.email.is_empty());
        assert!(parsed.password.is_empty());
    }
}

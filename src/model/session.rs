use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{is_email, ValidationError};

/// Minimum password length the backend accepts at login.
pub const MIN_PASSWORD_LEN: usize = 8;

/// An authenticated session: created by a successful login, removed on
/// logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// True once `expires_at` (RFC 3339) has passed. A missing or
    /// unreadable timestamp leaves the decision to the server.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .is_some_and(|expiry| expiry <= now)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::Required("Email"));
        }
        if !is_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "Password",
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl LoginResponse {
    /// The backend may omit the email; fall back to the one typed in.
    pub fn into_session(self, login_email: &str) -> Session {
        Session {
            token: self.token,
            email: self
                .email
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| login_email.to_string()),
            role: self.role.filter(|r| !r.is_empty()),
            expires_at: self.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let creds = Credentials {
            email: "alice@example.com".into(),
            password: "short".into(),
        };
        assert_eq!(
            creds.validate().unwrap_err().to_string(),
            "Password must be at least 8 characters"
        );

        let creds = Credentials {
            email: String::new(),
            password: "longenough".into(),
        };
        assert_eq!(creds.validate(), Err(ValidationError::Required("Email")));
    }

    #[test]
    fn test_login_response_falls_back_to_typed_email() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","expires_at":"2030-01-01T00:00:00Z","role":""}"#)
                .unwrap();
        let session = resp.into_session("alice@example.com");
        assert_eq!(session.email, "alice@example.com");
        assert_eq!(session.token, "abc");
        assert!(session.role.is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_session_expiry() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut session = Session {
            token: "t".into(),
            email: "alice@example.com".into(),
            role: None,
            expires_at: Some("2024-05-01T11:59:59Z".into()),
        };
        assert!(session.is_expired(now));

        session.expires_at = Some("2024-05-01T14:00:00+02:00".into());
        assert!(session.is_expired(now));

        session.expires_at = Some("2024-05-02T00:00:00Z".into());
        assert!(!session.is_expired(now));

        session.expires_at = Some("tomorrow".into());
        assert!(!session.is_expired(now));

        session.expires_at = None;
        assert!(!session.is_expired(now));
    }
}

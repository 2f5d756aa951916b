/// Async client for the MailRaven REST API.
///
/// Every request after login carries `Authorization: Bearer <token>`.
/// Failures are returned once and never retried.
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::model::message::{
    MessageFull, MessagePage, OutgoingMessage, ReadStateUpdate,
};
use crate::model::script::{FilterScript, NewScript};
use crate::model::session::{Credentials, LoginResponse, Session};
use crate::net::backend::{MailBackend, SieveBackend};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),
    #[error("Session expired, please sign in again")]
    Unauthorized,
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim())
            .ok()
            .filter(|u| !u.cannot_be_a_base() && matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| Error::InvalidUrl(base_url.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        })
    }

    /// A client that authenticates as `session`.
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            token: Some(session.token.clone()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        let response = builder.send().await?;
        check_status(response).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, Error> {
        let response = self
            .send(self.request(Method::POST, &["auth", "login"]).json(credentials))
            .await?;
        let login: LoginResponse = response.json().await?;
        tracing::info!(email = %credentials.email, "signed in");
        Ok(login.into_session(&credentials.email))
    }
}

impl SieveBackend for ApiClient {
    async fn list_scripts(&self) -> Result<Vec<FilterScript>, Error> {
        let response = self
            .send(self.request(Method::GET, &["sieve", "scripts"]))
            .await?;
        Ok(response.json().await?)
    }

    async fn put_script(&self, name: &str, content: &str) -> Result<(), Error> {
        self.send(
            self.request(Method::POST, &["sieve", "scripts"])
                .json(&NewScript { name, content }),
        )
        .await?;
        Ok(())
    }

    async fn activate_script(&self, name: &str) -> Result<(), Error> {
        self.send(self.request(Method::PUT, &["sieve", "scripts", name, "active"]))
            .await?;
        Ok(())
    }

    async fn delete_script(&self, name: &str) -> Result<(), Error> {
        self.send(self.request(Method::DELETE, &["sieve", "scripts", name]))
            .await?;
        Ok(())
    }
}

impl MailBackend for ApiClient {
    async fn list_messages(&self, limit: u32, offset: u32) -> Result<MessagePage, Error> {
        let response = self
            .send(
                self.request(Method::GET, &["messages"])
                    .query(&[("limit", limit), ("offset", offset)]),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn get_message(&self, id: &str) -> Result<MessageFull, Error> {
        let response = self
            .send(self.request(Method::GET, &["messages", id]))
            .await?;
        Ok(response.json().await?)
    }

    async fn mark_read(&self, id: &str) -> Result<(), Error> {
        self.send(
            self.request(Method::PATCH, &["messages", id])
                .json(&ReadStateUpdate { read_state: true }),
        )
        .await?;
        Ok(())
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), Error> {
        self.send(self.request(Method::POST, &["messages", "send"]).json(message))
            .await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::warn!(status = status.as_u16(), %message, "api request failed");
    Err(Error::Status {
        status: status.as_u16(),
        message,
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

/// Pull a human-readable message out of an error body, which is either
/// `{"error": "..."}` JSON or plain text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => Some(parsed.error),
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let client = ApiClient::new("http://localhost:8080/api/v1").unwrap();
        assert_eq!(
            client.endpoint(&["sieve", "scripts", "vacation", "active"]).as_str(),
            "http://localhost:8080/api/v1/sieve/scripts/vacation/active"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = ApiClient::new("https://mail.example.com/api/v1/").unwrap();
        assert_eq!(
            client.endpoint(&["messages"]).as_str(),
            "https://mail.example.com/api/v1/messages"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = ApiClient::new("http://localhost:8080/api/v1").unwrap();
        assert_eq!(
            client.endpoint(&["sieve", "scripts", "my script/1"]).as_str(),
            "http://localhost:8080/api/v1/sieve/scripts/my%20script%2F1"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(Error::InvalidUrl(_))));
        assert!(matches!(ApiClient::new("mailto:a@b.c"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_with_session_sets_token() {
        let client = ApiClient::new("http://localhost:8080/api/v1").unwrap();
        assert!(client.token.is_none());
        let session = Session {
            token: "t0k".into(),
            email: "alice@example.com".into(),
            role: None,
            expires_at: None,
        };
        assert_eq!(client.with_session(&session).token.as_deref(), Some("t0k"));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"error":"Invalid email or password"}"#).as_deref(), Some("Invalid email or password"));
        assert_eq!(error_message(r#"{"message":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message("Script not found\n").as_deref(), Some("Script not found"));
        assert_eq!(error_message("  "), None);
    }
}

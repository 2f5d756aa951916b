use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Overrides the stored server URL when set.
pub const API_URL_ENV: &str = "MAILRAVEN_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Environment beats the settings file, which beats the default.
    pub fn resolve(env_url: Option<String>, stored: Option<Settings>) -> Self {
        let mut settings = stored
            .filter(|s| !s.api_url.trim().is_empty())
            .unwrap_or_default();
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            settings.api_url = url.trim().to_string();
        }
        settings
    }
}

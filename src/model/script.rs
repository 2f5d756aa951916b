use serde::{Deserialize, Serialize};

/// A Sieve script as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterScript {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request body for create/replace.
#[derive(Debug, Clone, Serialize)]
pub struct NewScript<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_timestamps() {
        let script: FilterScript =
            serde_json::from_str(r#"{"name":"vacation","content":"keep;","is_active":true}"#)
                .unwrap();
        assert_eq!(script.name, "vacation");
        assert!(script.is_active);
        assert!(script.created_at.is_none());
    }
}

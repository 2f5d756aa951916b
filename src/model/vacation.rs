use serde::{Deserialize, Serialize};

use crate::model::ValidationError;

pub const DEFAULT_SUBJECT: &str = "Out of Office";
pub const DEFAULT_BODY: &str = "I am currently away and will respond when I return.";
pub const DEFAULT_DAYS: u32 = 1;

/// The auto-responder settings as edited on the vacation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRule {
    pub enabled: bool,
    pub subject: String,
    pub body: String,
    /// Minimum days between two replies to the same sender.
    pub days: u32,
}

impl Default for VacationRule {
    fn default() -> Self {
        Self {
            enabled: false,
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
            days: DEFAULT_DAYS,
        }
    }
}

impl VacationRule {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subject.trim().is_empty() {
            return Err(ValidationError::Required("Subject"));
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::Required("Message"));
        }
        if self.days < 1 {
            return Err(ValidationError::TooSmall {
                field: "Days",
                min: 1,
            });
        }
        Ok(())
    }
}

/// What the settings page learned from the backend on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VacationState {
    /// No script named `vacation` exists.
    Absent,
    /// The script matches the template this client writes.
    Recognized(VacationRule),
    /// The script exists but was written by something else; only the
    /// activation flag is trustworthy.
    ExternallyManaged { active: bool },
}

impl VacationState {
    /// The rule the form starts from.
    pub fn rule(&self) -> VacationRule {
        match self {
            Self::Absent => VacationRule::default(),
            Self::Recognized(rule) => rule.clone(),
            Self::ExternallyManaged { active } => VacationRule {
                enabled: *active,
                ..VacationRule::default()
            },
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::ExternallyManaged { .. })
    }
}

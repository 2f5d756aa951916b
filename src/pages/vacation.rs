/// Vacation auto-responder: load, enable and disable against the backend.
///
/// Enabling is two sequential calls (save, then activate). If the save
/// fails nothing else is sent; if the activation fails the saved script is
/// left in place and the failure is reported as is.
use crate::model::vacation::{VacationRule, VacationState};
use crate::model::ValidationError;
use crate::net::api;
use crate::net::backend::SieveBackend;
use crate::sieve::vacation::{self as codec, SCRIPT_NAME};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("saving the script failed: {0}")]
    Save(#[source] api::Error),
    #[error("script saved but activation failed: {0}")]
    Activate(#[source] api::Error),
    #[error("deleting the script failed: {0}")]
    Delete(#[source] api::Error),
}

/// Result of reading the script list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub state: VacationState,
    /// Other scripts the backend reports as active. Activating ours may
    /// switch them off if the backend allows only one active script.
    pub other_active: Vec<String>,
}

pub async fn load<B: SieveBackend>(backend: &B) -> Result<Loaded, api::Error> {
    let scripts = backend.list_scripts().await?;
    let state = codec::decode(scripts.iter().find(|s| s.name == SCRIPT_NAME));
    let other_active = scripts
        .iter()
        .filter(|s| s.is_active && s.name != SCRIPT_NAME)
        .map(|s| s.name.clone())
        .collect();
    tracing::debug!(?state, ?other_active, "vacation settings loaded");
    Ok(Loaded {
        state,
        other_active,
    })
}

/// Store the rule under `vacation` and activate it. Activation is only
/// sent once the save has succeeded.
pub async fn enable<B: SieveBackend>(backend: &B, rule: &VacationRule) -> Result<(), SaveError> {
    rule.validate()?;
    let content = codec::encode(rule);

    backend
        .put_script(SCRIPT_NAME, &content)
        .await
        .map_err(SaveError::Save)?;
    backend
        .activate_script(SCRIPT_NAME)
        .await
        .map_err(SaveError::Activate)?;

    tracing::info!(days = rule.days, "vacation response enabled");
    Ok(())
}

/// Remove the `vacation` script. This discards the stored text as well.
pub async fn disable<B: SieveBackend>(backend: &B) -> Result<(), SaveError> {
    backend
        .delete_script(SCRIPT_NAME)
        .await
        .map_err(SaveError::Delete)?;
    tracing::info!("vacation response disabled");
    Ok(())
}

/// Enable or disable depending on `rule.enabled`.
pub async fn apply<B: SieveBackend>(backend: &B, rule: &VacationRule) -> Result<(), SaveError> {
    if rule.enabled {
        enable(backend, rule).await
    } else {
        disable(backend).await
    }
}

/// Editable copy of the rule as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacationForm {
    pub enabled: bool,
    pub subject: String,
    pub body: String,
    pub days: String,
}

impl VacationForm {
    pub fn from_rule(rule: &VacationRule) -> Self {
        Self {
            enabled: rule.enabled,
            subject: rule.subject.clone(),
            body: rule.body.clone(),
            days: rule.days.to_string(),
        }
    }

    /// Fields are only checked when the responder is being switched on.
    pub fn to_rule(&self) -> Result<VacationRule, ValidationError> {
        let days = self.days.trim().parse::<u32>().unwrap_or(0);
        let rule = VacationRule {
            enabled: self.enabled,
            subject: self.subject.clone(),
            body: self.body.clone(),
            days,
        };
        if rule.enabled {
            rule.validate()?;
        }
        Ok(rule)
    }
}

impl Default for VacationForm {
    fn default() -> Self {
        Self::from_rule(&VacationRule::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

/// State of the vacation settings page.
#[derive(Debug, Clone)]
pub struct VacationPage {
    pub status: LoadStatus,
    pub state: VacationState,
    pub form: VacationForm,
    pub other_active: Vec<String>,
    /// The user accepted that other active scripts may be switched off.
    pub acknowledged: bool,
    pub saving: bool,
}

impl Default for VacationPage {
    fn default() -> Self {
        Self {
            status: LoadStatus::Loading,
            state: VacationState::Absent,
            form: VacationForm::default(),
            other_active: Vec::new(),
            acknowledged: false,
            saving: false,
        }
    }
}

impl VacationPage {
    pub fn begin_load(&mut self) {
        *self = Self::default();
    }

    pub fn loaded(&mut self, result: Result<Loaded, String>) {
        match result {
            Ok(loaded) => {
                self.form = VacationForm::from_rule(&loaded.state.rule());
                self.state = loaded.state;
                self.other_active = loaded.other_active;
                self.status = LoadStatus::Ready;
            }
            Err(_) => self.status = LoadStatus::Failed,
        }
    }

    pub fn needs_acknowledgement(&self) -> bool {
        self.form.enabled && !self.other_active.is_empty()
    }

    pub fn can_save(&self) -> bool {
        self.status == LoadStatus::Ready
            && self.state.is_editable()
            && !self.saving
            && (!self.needs_acknowledgement() || self.acknowledged)
    }

    /// Record a confirmed save. Local state changes only here, after the
    /// backend has answered.
    pub fn saved(&mut self, rule: VacationRule) {
        self.saving = false;
        self.state = if rule.enabled {
            VacationState::Recognized(rule)
        } else {
            VacationState::Absent
        };
        self.acknowledged = false;
    }

    pub fn save_failed(&mut self) {
        self.saving = false;
    }
}

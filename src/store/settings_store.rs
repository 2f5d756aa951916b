use std::path::{Path, PathBuf};

use crate::config::paths;
use crate::config::settings::{Settings, API_URL_ENV};
use crate::store::{read_json, write_json};

const SETTINGS_FILE: &str = "settings.json";

fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

/// Stored settings with the environment override applied.
pub fn load_settings() -> Settings {
    let stored = paths::config_dir().and_then(|d| read_json(&settings_path(&d)));
    Settings::resolve(std::env::var(API_URL_ENV).ok(), stored)
}

pub fn save_settings(settings: &Settings) {
    if let Some(dir) = paths::config_dir() {
        write_json(&settings_path(&dir), settings);
    }
}

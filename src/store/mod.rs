pub mod session_store;
pub mod settings_store;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable file");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let result = serde_json::to_string_pretty(value)
        .map_err(std::io::Error::from)
        .and_then(|data| fs::write(path, data));
    if let Err(e) = result {
        tracing::warn!(path = %path.display(), error = %e, "could not write file");
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::paths;
use crate::model::session::Session;
use crate::store::{read_json, write_json};

const SESSION_FILE: &str = "session.json";

fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}

pub fn load_session() -> Option<Session> {
    paths::config_dir().and_then(|d| load_session_in(&d))
}

pub fn save_session(session: &Session) {
    if let Some(dir) = paths::config_dir() {
        save_session_in(&dir, session);
    }
}

pub fn clear_session() {
    if let Some(dir) = paths::config_dir() {
        clear_session_in(&dir);
    }
}

fn load_session_in(dir: &Path) -> Option<Session> {
    read_json::<Session>(&session_path(dir)).filter(|s| !s.token.is_empty())
}

fn save_session_in(dir: &Path, session: &Session) {
    write_json(&session_path(dir), session);
}

fn clear_session_in(dir: &Path) {
    let path = session_path(dir);
    if path.exists() {
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove session");
        }
    }
}

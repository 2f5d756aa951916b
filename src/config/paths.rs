use directories::ProjectDirs;
use std::path::PathBuf;

pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "MailRaven Console").map(|d| d.config_dir().to_path_buf())
}

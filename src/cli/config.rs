// Client-side state: the stored session and the cached current-user
// snapshot. The snapshot is what `post list`/`post search` render; it is
// refreshed from /me after every successful mutation so post lists and
// counts stay consistent with the server.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::database::models::UserBody;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub server: String,
    /// Raw session cookie value captured from Set-Cookie at login.
    pub token: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            server: "http://localhost:5000".to_string(),
            token: None,
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("GALLERY_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("gallery").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<SessionState> {
    let session_file = get_config_dir()?.join("session.json");

    if !session_file.exists() {
        return Ok(SessionState::default());
    }

    let content = fs::read_to_string(session_file)?;
    let state: SessionState = serde_json::from_str(&content)?;
    Ok(state)
}

pub fn save_session(state: &SessionState) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join("session.json");

    let content = serde_json::to_string_pretty(state)?;
    fs::write(session_file, content)?;
    Ok(())
}

pub fn load_cached_user() -> anyhow::Result<Option<UserBody>> {
    let user_file = get_config_dir()?.join("user.json");

    if !user_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(user_file)?;
    let user: UserBody = serde_json::from_str(&content)?;
    Ok(Some(user))
}

pub fn save_cached_user(user: &UserBody) -> anyhow::Result<()> {
    let user_file = get_config_dir()?.join("user.json");

    let content = serde_json::to_string_pretty(user)?;
    fs::write(user_file, content)?;
    Ok(())
}

pub fn clear_cached_user() -> anyhow::Result<()> {
    let user_file = get_config_dir()?.join("user.json");

    if user_file.exists() {
        fs::remove_file(user_file)?;
    }
    Ok(())
}

/// Effective server base URL: explicit flag, then GALLERY_SERVER, then the
/// stored session's server.
pub fn resolve_server(flag: Option<String>, state: &SessionState) -> String {
    flag.or_else(|| std::env::var("GALLERY_SERVER").ok())
        .unwrap_or_else(|| state.server.clone())
        .trim_end_matches('/')
        .to_string()
}

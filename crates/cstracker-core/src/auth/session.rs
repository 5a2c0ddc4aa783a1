use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Role;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, username: String, role: Role) -> Self {
        Self {
            token,
            username,
            role,
            created_at: Utc::now(),
        }
    }

    /// "signed in 3h ago" style age for the status bar
    pub fn age_display(&self) -> String {
        let minutes = (Utc::now() - self.created_at).num_minutes();
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

pub struct Session {
    data_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns whether a session was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;
            debug!(username = %data.username, role = %data.role, "Session loaded");
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents).context("Failed to write session file")?;
        }
        Ok(())
    }

    /// Clear session data and remove the file
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the token if a session exists
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load().unwrap());
        assert!(session.token().is_none());

        session.update(SessionData::new("tok123".into(), "admin".into(), Role::Admin));
        session.save().unwrap();

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.token(), Some("tok123"));
        assert_eq!(reloaded.data.as_ref().map(|d| d.role), Some(Role::Admin));

        reloaded.clear().unwrap();
        assert!(reloaded.token().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());

        let mut again = Session::new(dir.path().to_path_buf());
        assert!(!again.load().unwrap());
    }

    #[test]
    fn test_corrupt_session_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        assert!(session.load().is_err());
        assert!(session.data.is_none());
    }

    #[test]
    fn test_age_display() {
        let mut data = SessionData::new("t".into(), "u".into(), Role::Student);
        assert_eq!(data.age_display(), "just now");
        data.created_at = Utc::now() - Duration::minutes(5);
        assert_eq!(data.age_display(), "5m ago");
        data.created_at = Utc::now() - Duration::hours(3);
        assert_eq!(data.age_display(), "3h ago");
        data.created_at = Utc::now() - Duration::days(2);
        assert_eq!(data.age_display(), "2d ago");
    }
}

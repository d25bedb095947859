//! Session Detection & Completion Markers
//!
//! Decides which mode the wizard runs in and records that setup has been
//! completed so the session does not launch it again.

use crate::page_table::SetupMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dedicated account the display manager runs first-boot setup as
pub const SETUP_USER: &str = "initial-setup";

/// Kiosk-style account that never goes through setup
pub const SHARED_USER: &str = "shared";

/// Marker file written to the user's config directory once setup is done
pub const DONE_FILE_NAME: &str = "initial-setup-done";

/// Saved choices, next to the marker
pub const CHOICES_FILE_NAME: &str = "initial-setup.toml";

/// Choices collected by the setup pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_layout: Option<String>,
    #[serde(default)]
    pub eula_accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Whether the process runs as the named account
pub fn is_running_as_user(username: &str) -> bool {
    match pwd::Passwd::from_name(username) {
        Ok(Some(passwd)) => passwd.uid == current_uid(),
        Ok(None) => false,
        Err(e) => {
            tracing::debug!("Account lookup for {} failed: {:?}", username, e);
            false
        }
    }
}

fn current_uid() -> u32 {
    // SAFETY: getuid has no preconditions and cannot fail.
    unsafe { libc::getuid() }
}

/// Work out the setup mode for this process
pub fn detect_mode(force_new_user: bool) -> SetupMode {
    mode_for(force_new_user, is_running_as_user(SETUP_USER))
}

fn mode_for(force_new_user: bool, is_setup_user: bool) -> SetupMode {
    if force_new_user || is_setup_user {
        SetupMode::NewUser
    } else {
        SetupMode::ExistingUser
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

/// Write the setup-done marker into `dir`
pub fn mark_setup_done_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(DONE_FILE_NAME);
    std::fs::write(&path, "yes")
        .with_context(|| format!("Unable to create {}", path.display()))?;

    Ok(path)
}

/// Write the setup-done marker; failures are logged, never fatal
pub fn mark_setup_done() {
    let Some(dir) = config_dir() else {
        tracing::warn!("No config directory available, not marking setup as done");
        return;
    };

    match mark_setup_done_in(&dir) {
        Ok(path) => tracing::info!("Setup marked as done: {}", path.display()),
        Err(e) => tracing::warn!("{:#}", e),
    }
}

/// Persist the collected choices into `dir`
pub fn save_choices_in(dir: &Path, data: &SetupData) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let contents = toml::to_string_pretty(data).context("Failed to serialize setup choices")?;
    let path = dir.join(CHOICES_FILE_NAME);
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

pub fn save_choices(data: &SetupData) -> Result<PathBuf> {
    let dir = config_dir().context("No config directory available")?;
    save_choices_in(&dir, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert_eq!(mode_for(true, false), SetupMode::NewUser);
        assert_eq!(mode_for(false, true), SetupMode::NewUser);
        assert_eq!(mode_for(false, false), SetupMode::ExistingUser);
    }

    #[test]
    fn test_unknown_account_is_not_us() {
        assert!(!is_running_as_user("no-such-account-initial-setup-test"));
    }

    #[test]
    fn test_mark_setup_done_in() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("config");

        let path = mark_setup_done_in(&nested).unwrap();
        assert_eq!(path, nested.join(DONE_FILE_NAME));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "yes");
    }

    #[test]
    fn test_save_choices_in() {
        let dir = tempfile::tempdir().unwrap();
        let data = SetupData {
            language: Some("de_DE.UTF-8".to_string()),
            username: Some("ada".to_string()),
            eula_accepted: true,
            ..Default::default()
        };

        let path = save_choices_in(dir.path(), &data).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("username = \"ada\""));
        assert!(!contents.contains("timezone"));

        let parsed: SetupData = toml::from_str(&contents).unwrap();
        assert_eq!(parsed, data);
    }
}

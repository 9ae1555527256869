//! Settings file and credential resolution.
//!
//! Credentials come from three places, in this order of preference:
//! command-line flags, the settings file, and (for tokens only) the
//! environment.

use crate::error::CliError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Controller used when neither a flag nor the settings file names one.
pub const DEFAULT_CONTROLLER: &str = "https://api.elcapitan.cloudgenix.com";

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "lqm_settings.toml";

/// Token environment variables, highest priority first.
pub const TOKEN_ENV_VARS: [&str; 2] = ["X_AUTH_TOKEN", "AUTH_TOKEN"];

/// Contents of a settings file. Every key is optional.
///
/// ```toml
/// controller = "https://api.elcapitan.cloudgenix.com"
/// auth_token = "..."
/// user = "ops@example.com"
/// password = "..."
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub controller: Option<String>,
    pub auth_token: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Settings {
    /// Load settings from an explicit path, or the first default location
    /// that exists. No file at all yields empty settings.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::FileNotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        match default_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse one settings file.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        debug!(path = %path.display(), "loading settings");
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Settings locations searched when `--settings` is not given.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SETTINGS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("lqmcfg").join("settings.toml"));
    }
    paths
}

/// Controller URL: flag, then settings, then the default.
pub fn resolve_controller(flag: Option<&str>, settings: &Settings) -> String {
    flag.map(str::to_string)
        .or_else(|| settings.controller.clone())
        .unwrap_or_else(|| DEFAULT_CONTROLLER.to_string())
}

/// Resolved login material.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Email or password was given on the command line.
    pub explicit_login: bool,
}

impl Credentials {
    /// Combine flags, settings, and environment.
    ///
    /// `env` looks up an environment variable; it is a parameter so callers
    /// can resolve against something other than the process environment.
    pub fn resolve(
        email: Option<&str>,
        password: Option<&str>,
        settings: &Settings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let present = |t: &String| !t.is_empty();
        let token = settings
            .auth_token
            .clone()
            .filter(present)
            .or_else(|| TOKEN_ENV_VARS.iter().find_map(|var| env(var).filter(present)));

        Self {
            token,
            email: email.map(str::to_string).or_else(|| settings.user.clone()),
            password: password.map(str::to_string).or_else(|| settings.password.clone()),
            explicit_login: email.is_some() || password.is_some(),
        }
    }

    /// A token is used unless the operator asked for a password login.
    pub fn prefers_token(&self) -> bool {
        self.token.is_some() && !self.explicit_login
    }
}

// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::event::{DEFAULT_COLOR, parse_color};

/// The name of the daymark application.
pub const APP_NAME: &str = "daymark";

/// Configuration for the daymark application.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Directory for the durable store. `None` means in-memory, which is
    /// only useful for tests.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Directory for cover image files. Defaults to `<state_dir>/covers`.
    #[serde(default)]
    pub images_dir: Option<PathBuf>,

    /// Default cover color for new events, as `#RRGGBB` or `#AARRGGBB`.
    #[serde(default)]
    pub default_color: Option<String>,
}

impl Config {
    /// Normalize the configuration: expand paths and fill in platform
    /// defaults for the state and image directories.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        match &self.state_dir {
            Some(dir) => {
                self.state_dir = Some(
                    expand_path(dir).map_err(|e| format!("Failed to expand state_dir: {e}"))?,
                )
            }
            None => match get_state_dir() {
                Ok(dir) => self.state_dir = Some(dir.join(APP_NAME)),
                Err(e) => tracing::warn!("Failed to get state directory: {e}"),
            },
        }

        match &self.images_dir {
            Some(dir) => {
                self.images_dir = Some(
                    expand_path(dir).map_err(|e| format!("Failed to expand images_dir: {e}"))?,
                )
            }
            None => self.images_dir = self.state_dir.as_ref().map(|dir| dir.join("covers")),
        }

        if let Some(color) = &self.default_color {
            // validate eagerly so a typo fails at startup, not on first add
            parse_color(color).map_err(|e| format!("Invalid default_color: {e}"))?;
        }

        Ok(())
    }

    /// The default cover color for new events.
    pub fn default_color(&self) -> u32 {
        self.default_color
            .as_deref()
            .and_then(|s| parse_color(s).ok())
            .unwrap_or(DEFAULT_COLOR)
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or("User-specific home directory not found".into())
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or("User-specific config directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or("User-specific state directory not found".into())
}

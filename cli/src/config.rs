// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use tokio::fs;

use daymark_core::{APP_NAME, Config as CoreConfig};

const DAYMARK_CONFIG_ENV: &str = "DAYMARK_CONFIG";

/// Resolves and reads the configuration file. Priority: the `--config`
/// flag, then the `DAYMARK_CONFIG` environment variable, then the
/// platform config directory. A missing default file is not an error:
/// every setting has a working default.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<CoreConfig, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(DAYMARK_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if !config.exists() {
            return Ok(CoreConfig::default());
        }
        config
    };

    fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()
        .map(|a| a.core)
}

#[derive(Debug, Default, serde::Deserialize)]
struct ConfigRaw {
    #[serde(default)]
    core: CoreConfig,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::OnceLock;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn write_config(dir: &TempDir, name: &str, state: &str) -> PathBuf {
        let path = dir.path().join(name);
        let content = format!(
            r#"
[core]
state_dir = "{state}"
"#
        );
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let cli_path = write_config(&temp_dir, "cli.toml", "/tmp/daymark-cli");
        let env_path = write_config(&temp_dir, "env.toml", "/tmp/daymark-env");

        {
            let _guard = env_lock().lock().await;
            unsafe {
                std::env::set_var(DAYMARK_CONFIG_ENV, env_path.to_str().unwrap());
            }

            let config = parse_config(Some(cli_path)).await.unwrap();
            assert_eq!(config.state_dir, Some(PathBuf::from("/tmp/daymark-cli")));

            unsafe {
                std::env::remove_var(DAYMARK_CONFIG_ENV);
            }
        }
    }

    #[tokio::test]
    async fn env_var_overrides_default_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = write_config(&temp_dir, "env.toml", "/tmp/daymark-env");

        {
            let _guard = env_lock().lock().await;
            unsafe {
                std::env::set_var(DAYMARK_CONFIG_ENV, env_path.to_str().unwrap());
            }

            let config = parse_config(None).await.unwrap();
            assert_eq!(config.state_dir, Some(PathBuf::from("/tmp/daymark-env")));

            unsafe {
                std::env::remove_var(DAYMARK_CONFIG_ENV);
            }
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_default_config_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let empty_dir = temp_dir.path().join("empty");
        fs::create_dir(&empty_dir).unwrap();

        {
            let _guard = env_lock().lock().await;
            unsafe {
                std::env::remove_var(DAYMARK_CONFIG_ENV);
                std::env::set_var("XDG_CONFIG_HOME", empty_dir.to_str().unwrap());
            }

            let config = parse_config(None).await.unwrap();
            assert!(config.state_dir.is_none());
            assert!(config.default_color.is_none());

            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[tokio::test]
    async fn explicit_missing_file_is_an_error() {
        let _guard = env_lock().lock().await;
        let result = parse_config(Some(PathBuf::from("/nonexistent/daymark.toml"))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rejects_malformed_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "not [valid toml").unwrap();

        let _guard = env_lock().lock().await;
        assert!(parse_config(Some(path)).await.is_err());
    }
}

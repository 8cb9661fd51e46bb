// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::fs;

use crate::revision::ChangeScope;

/// The name of the application.
pub const APP_NAME: &str = "recal";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "RECAL_CONFIG";

const DEFAULT_PROD_ID: &str = "-//recal//recal 0.1//EN";
const DEFAULT_FOLD_WIDTH: usize = 75;

/// Errors of loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file at {}: {source}", path.display())]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A path could not be expanded.
    #[error("{0}")]
    Path(String),
}

/// Configuration of the revision engine and the command line tool.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// PRODID written into calendars created from scratch.
    pub prod_id: String,

    /// Domain appended to generated UIDs as `<uuid>@<domain>`.
    pub uid_domain: Option<String>,

    /// Whether overrides get a RELATED-TO pointing at the series UID.
    pub relate_overrides: bool,

    /// Line width in octets at which output is folded, 0 disables folding.
    pub fold_width: usize,

    /// Calendar file used when a command is given none.
    pub calendar_path: Option<PathBuf>,

    /// Scope of an edit when none is given.
    pub default_scope: ChangeScope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prod_id: DEFAULT_PROD_ID.to_owned(),
            uid_domain: None,
            relate_overrides: false,
            fold_width: DEFAULT_FOLD_WIDTH,
            calendar_path: None,
            default_scope: ChangeScope::One,
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// The file is `path` when given, else the one named by `RECAL_CONFIG`,
    /// else `recal/config.toml` in the user configuration directory. Without
    /// any of them the defaults apply.
    ///
    /// # Errors
    ///
    /// Fails when the chosen file cannot be read or parsed.
    #[tracing::instrument]
    pub async fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path),
            None => match std::env::var(CONFIG_ENV) {
                Ok(env_path) if !env_path.is_empty() => Some(PathBuf::from(env_path)),
                _ => default_config_path().filter(|p| p.exists()),
            },
        };

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading config");
                fs::read_to_string(&path)
                    .await
                    .map_err(|source| ConfigError::Read { path, source })?
                    .parse::<Self>()?
            }
            None => {
                tracing::debug!("no config file, using defaults");
                Self::default()
            }
        };
        config.normalize()?;
        Ok(config)
    }

    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the home directory is needed but unknown.
    pub fn normalize(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = &self.calendar_path {
            self.calendar_path = Some(expand_path(path)?);
        }
        if let Some(domain) = &self.uid_domain {
            let domain = domain.trim().trim_start_matches('@');
            self.uid_domain = (!domain.is_empty()).then(|| domain.to_owned());
        }
        Ok(())
    }

    /// A fresh UID for a new series.
    #[must_use]
    pub fn new_uid(&self) -> String {
        let id = uuid::Uuid::new_v4();
        match &self.uid_domain {
            Some(domain) => format!("{id}@{domain}"),
            None => id.to_string(),
        }
    }

    /// The fold width as formatter option, `None` when folding is off.
    #[must_use]
    pub const fn folding(&self) -> Option<usize> {
        match self.fold_width {
            0 => None,
            n => Some(n),
        }
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path
        .to_str()
        .ok_or_else(|| ConfigError::Path(format!("invalid path: {}", path.display())))?;

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

fn default_config_path() -> Option<PathBuf> {
    match get_config_dir() {
        Ok(dir) => Some(dir.join(APP_NAME).join("config.toml")),
        Err(err) => {
            tracing::warn!(%err, "failed to locate config directory");
            None
        }
    }
}

fn get_home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or_else(|| ConfigError::Path("user home directory not found".to_owned()))
}

fn get_config_dir() -> Result<PathBuf, ConfigError> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| ConfigError::Path("user config directory not found".to_owned()))
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use std::sync::OnceLock;

    use tempfile::TempDir;
    use tokio::sync::Mutex;

    use super::*;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = r#"
prod_id = "-//Example//Planner//EN"
uid_domain = "example.com"
relate_overrides = true
fold_width = 0
calendar_path = "/tmp/work.ics"
default_scope = "this-and-future"
"#
        .parse()
        .unwrap();

        assert_eq!(config.prod_id, "-//Example//Planner//EN");
        assert_eq!(config.uid_domain.as_deref(), Some("example.com"));
        assert!(config.relate_overrides);
        assert_eq!(config.folding(), None);
        assert_eq!(config.calendar_path, Some(PathBuf::from("/tmp/work.ics")));
        assert_eq!(config.default_scope, ChangeScope::ThisAndFuture);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.folding(), Some(75));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!("fold_width = \"wide\"".parse::<Config>().is_err());
        assert!("relate_overrides = 1".parse::<Config>().is_err());
        assert!("default_scope = \"some\"".parse::<Config>().is_err());
    }

    #[test]
    fn test_new_uid() {
        let mut config = Config {
            uid_domain: Some(" @example.com ".to_owned()),
            ..Config::default()
        };
        config.normalize().unwrap();
        let uid = config.new_uid();
        assert!(uid.ends_with("@example.com"), "{uid}");
        assert_ne!(uid, config.new_uid());

        let bare = Config::default().new_uid();
        assert!(!bare.contains('@'));
        assert_eq!(bare.len(), 36);
    }

    #[test]
    fn test_expand_path_home_env() {
        let home = get_home_dir().unwrap();
        let home_prefixes: &[&str] = if cfg!(unix) {
            &["~", "$HOME", "${HOME}"]
        } else {
            &[r"~", r"%UserProfile%"]
        };
        for prefix in home_prefixes {
            let result = expand_path(&PathBuf::from(format!("{prefix}/cal.ics"))).unwrap();
            assert_eq!(result, home.join("cal.ics"));
            assert!(result.is_absolute());
        }
    }

    #[test]
    fn test_expand_path_absolute_and_relative() {
        let absolute_path = PathBuf::from("/etc/calendar.ics");
        assert_eq!(expand_path(&absolute_path).unwrap(), absolute_path);

        let relative_path = PathBuf::from("relative/path/to/file.ics");
        assert_eq!(expand_path(&relative_path).unwrap(), relative_path);
    }

    #[tokio::test]
    async fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "prod_id = \"-//Test//EN\"\nfold_width = 60\n").unwrap();

        let _guard = env_lock().lock().await;
        let config = Config::load(Some(config_path)).await.unwrap();
        assert_eq!(config.prod_id, "-//Test//EN");
        assert_eq!(config.folding(), Some(60));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        let _guard = env_lock().lock().await;
        let err = Config::load(Some(missing)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_cli_path_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let cli_path = temp_dir.path().join("cli.toml");
        let env_path = temp_dir.path().join("env.toml");
        std::fs::write(&cli_path, "prod_id = \"cli\"\n").unwrap();
        std::fs::write(&env_path, "prod_id = \"env\"\n").unwrap();

        let _guard = env_lock().lock().await;
        unsafe {
            std::env::set_var(CONFIG_ENV, &env_path);
        }

        let from_cli = Config::load(Some(cli_path)).await.unwrap();
        let from_env = Config::load(None).await.unwrap();

        unsafe {
            std::env::remove_var(CONFIG_ENV);
        }

        assert_eq!(from_cli.prod_id, "cli");
        assert_eq!(from_env.prod_id, "env");
    }
}

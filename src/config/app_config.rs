use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::adapters::secrets::env_secret_source::EnvSecretSource;
use crate::adapters::secrets::file_secret_source::FileSecretSource;
use crate::core::errors::{PgpError, Result};
use crate::core::traits::secret_source::SecretSource;

/// Top-level configuration read from `config.toml`.
///
/// Every section is optional; missing values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub secrets: SecretsSection,
    #[serde(default)]
    pub session: SessionSection,
}

impl AppConfig {
    /// Load configuration from an explicit path, or from the user config
    /// directory when none is given. A missing default file yields the
    /// built-in defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(PgpError::FileNotFound {
                        path: p.to_path_buf(),
                    });
                }
                p.to_path_buf()
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content).map_err(|e| match e {
            PgpError::InvalidConfig { detail } => PgpError::InvalidConfig {
                detail: format!("{}: {detail}", config_path.display()),
            },
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| PgpError::InvalidConfig {
            detail: format!("Failed to parse config: {e}"),
        })?;

        if config.engine.gpg_binary.trim().is_empty() {
            return Err(PgpError::InvalidConfig {
                detail: "[engine].gpg_binary must not be empty".into(),
            });
        }
        if config.secrets.source == SecretSourceKind::File && config.secrets.dir.is_none() {
            return Err(PgpError::InvalidConfig {
                detail: "[secrets].dir is required when source = \"file\"".into(),
            });
        }

        Ok(config)
    }

    /// `<config dir>/pgpcrypto/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pgpcrypto").join("config.toml"))
    }

    /// Build the configured secret source.
    pub fn secret_source(&self) -> Box<dyn SecretSource> {
        match (&self.secrets.source, &self.secrets.dir) {
            (SecretSourceKind::File, Some(dir)) => Box::new(FileSecretSource::new(dir.clone())),
            _ => Box::new(EnvSecretSource::new(&self.secrets.prefix)),
        }
    }

    /// Directory under which session workspaces are created.
    pub fn workspace_root(&self) -> PathBuf {
        self.engine
            .workspace_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// The `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    #[serde(default = "default_gpg_binary")]
    pub gpg_binary: String,
    pub workspace_root: Option<PathBuf>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            gpg_binary: default_gpg_binary(),
            workspace_root: None,
        }
    }
}

fn default_gpg_binary() -> String {
    "gpg".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSourceKind {
    #[default]
    Env,
    File,
}

/// The `[secrets]` section: where secrets come from and what they are called.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsSection {
    pub source: SecretSourceKind,
    pub dir: Option<PathBuf>,
    pub prefix: String,
    pub recipient: String,
    pub passphrase: String,
    pub public_key: String,
    pub secret_key: String,
}

impl Default for SecretsSection {
    fn default() -> Self {
        Self {
            source: SecretSourceKind::Env,
            dir: None,
            prefix: String::new(),
            recipient: "pgpcrypto/recipient".into(),
            passphrase: "pgpcrypto/passphrase".into(),
            public_key: "pgpcrypto/public_key".into(),
            secret_key: "pgpcrypto/private_key".into(),
        }
    }
}

/// The `[session]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    /// Recipient label used when neither the CLI nor the secret source
    /// provides one.
    pub fallback_recipient: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            fallback_recipient: "Test User".into(),
        }
    }
}

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::engine::gpg_engine::GpgEngine;
use crate::adapters::workspace::temp_workspace::Workspace;
use crate::config::app_config::AppConfig;
use crate::core::errors::{PgpError, Result};
use crate::core::services::encryption_service::EncryptionService;
use crate::core::traits::engine::OpenPgpEngine;

/// One isolated session: a fresh workspace and the service bound to its
/// keyring.
///
/// `service` is declared before `workspace` so the engine is dropped
/// (and its agent stopped) before the directory is removed.
pub struct Session {
    pub service: EncryptionService<GpgEngine>,
    workspace: Workspace,
}

impl Session {
    /// Create a workspace and an engine pinned to it.
    pub fn open(config: &AppConfig, gpg_override: Option<&str>) -> Result<Self> {
        let gpg_binary = gpg_override.unwrap_or(&config.engine.gpg_binary);
        let workspace = Workspace::create(&config.workspace_root())?;
        let engine = GpgEngine::with_path(
            PathBuf::from(gpg_binary),
            workspace.gnupg_home().to_path_buf(),
        );
        if !engine.is_available() {
            return Err(PgpError::EngineUnavailable {
                reason: format!("'{gpg_binary}' is not installed or not found in PATH"),
            });
        }

        debug!(
            engine = engine.name(),
            workspace = %workspace.path().display(),
            home = %engine.home().display(),
            "session opened"
        );

        Ok(Self {
            service: EncryptionService::new(engine),
            workspace,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Tear the session down, reporting workspace removal failures.
    pub fn close(self) -> Result<()> {
        let Self { service, workspace } = self;
        drop(service);
        workspace.close()
    }
}

/// Read an armored key file supplied on the command line.
pub fn read_key_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PgpError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// A passphrase given on the command line or through the environment.
pub fn require_passphrase(passphrase: Option<&str>) -> Result<&str> {
    passphrase
        .filter(|p| !p.is_empty())
        .ok_or_else(|| PgpError::Configuration {
            detail: "a passphrase is required (--passphrase or PGPCRYPTO_PASSPHRASE)".into(),
        })
}

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::errors::{PgpError, Result};

/// Name of the keyring directory inside a workspace.
pub const GNUPG_HOME: &str = ".gnupghome";

/// Private on-disk area holding one session's keyring and scratch files.
///
/// The directory is created fresh and removed when the workspace is
/// dropped, whether the session succeeded, failed or unwound.
pub struct Workspace {
    dir: tempfile::TempDir,
    gnupg_home: PathBuf,
}

impl Workspace {
    /// Create a new workspace under `root`.
    pub fn create(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(PgpError::InvalidConfig {
                detail: format!("workspace root {} is not a directory", root.display()),
            });
        }

        let dir = tempfile::Builder::new()
            .prefix("pgpcrypto-")
            .tempdir_in(root)?;
        let gnupg_home = dir.path().join(GNUPG_HOME);
        std::fs::create_dir(&gnupg_home)?;
        restrict_permissions(&gnupg_home)?;

        debug!(path = %dir.path().display(), "workspace created");
        Ok(Self { dir, gnupg_home })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Keyring directory for the engine.
    pub fn gnupg_home(&self) -> &Path {
        &self.gnupg_home
    }

    /// Path for a scratch file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Remove the workspace now, reporting failures instead of
    /// swallowing them as `Drop` does.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!(path = %path.display(), "workspace removed");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

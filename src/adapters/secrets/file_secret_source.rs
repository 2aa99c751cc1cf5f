use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::core::traits::secret_source::SecretSource;

/// Reads secrets from files under a root directory, e.g. a mounted
/// secrets volume. `pgpcrypto/public_key` is read from
/// `<root>/pgpcrypto/public_key`.
pub struct FileSecretSource {
    root: PathBuf,
}

impl FileSecretSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a secret name to a path, refusing anything that could
    /// escape the root.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || name.is_empty() {
            warn!(secret = name, "rejected secret name");
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl SecretSource for FileSecretSource {
    fn get(&self, name: &str) -> Option<String> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            debug!(secret = name, path = %path.display(), "secret file not found");
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                warn!(secret = name, error = %e, "could not read secret file");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

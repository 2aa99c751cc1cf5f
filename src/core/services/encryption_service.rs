use std::path::Path;

use tracing::{debug, warn};

use crate::core::errors::{PgpError, Result};
use crate::core::models::key_identifier::KeyIdentifier;
use crate::core::services::key_registry::KeyRegistry;
use crate::core::traits::engine::OpenPgpEngine;

/// Encrypt/decrypt entry points. Recipients and passphrases are resolved
/// through the `KeyRegistry`; the byte transform is left to the engine.
pub struct EncryptionService<E: OpenPgpEngine> {
    pub registry: KeyRegistry<E>,
}

impl<E: OpenPgpEngine> EncryptionService<E> {
    pub fn new(engine: E) -> Self {
        Self {
            registry: KeyRegistry::new(engine),
        }
    }

    /// Encrypt `input` to `recipient`, or to the default recipient when
    /// none is given, writing ASCII armor to `output`.
    pub fn encrypt_file(&self, input: &Path, output: &Path, recipient: Option<&str>) -> Result<()> {
        let label = match recipient.filter(|r| !r.trim().is_empty()) {
            Some(label) => label,
            None => self
                .registry
                .resolve_default_recipient()
                .ok_or_else(|| PgpError::Configuration {
                    detail: "no recipient given and no public key imported".into(),
                })?,
        };
        ensure_exists(input)?;

        let target = self.registry.resolve_recipient(label);
        debug!(recipient = %label, target = %target, "encrypting");

        let outcome = self.registry.engine().encrypt_file(input, output, &target)?;
        if !outcome.ok {
            return Err(PgpError::Encryption {
                reason: outcome.diagnostic,
            });
        }
        Ok(())
    }

    /// Decrypt `input` with the passphrase bound to the first recipient ID
    /// in its header.
    ///
    /// Only the first listed ID is considered. A later ID with a known
    /// passphrase is not tried. Returns the plaintext when `output` is
    /// `None`.
    pub fn decrypt_file(&self, input: &Path, output: Option<&Path>) -> Result<Option<Vec<u8>>> {
        ensure_exists(input)?;
        let engine = self.registry.engine();

        let ids = engine.recipient_ids(input)?;
        let first = ids
            .first()
            .map(|raw| KeyIdentifier::new(raw))
            .filter(KeyIdentifier::is_usable)
            .ok_or_else(|| PgpError::Resolution {
                path: input.to_path_buf(),
                detail: "no recipient keyid found".into(),
            })?;

        let passphrase =
            self.registry
                .lookup_passphrase(&first)
                .ok_or_else(|| PgpError::Resolution {
                    path: input.to_path_buf(),
                    detail: format!("no passphrase for keyid {}", ids.join(", ")),
                })?;
        debug!(keyid = %first, "decrypting");

        let preexisting = output.is_some_and(Path::exists);
        let outcome = engine.decrypt_file(input, output, passphrase)?;
        if !outcome.ok {
            if let Some(path) = output.filter(|_| !preexisting) {
                discard_partial(path);
            }
            return Err(PgpError::Decryption {
                reason: outcome.diagnostic,
            });
        }

        Ok(match output {
            Some(_) => None,
            None => Some(outcome.data),
        })
    }

    /// Recipient IDs embedded in a ciphertext, in short (8 hex) form and
    /// in the order the engine lists them.
    pub fn recipient_ids(&self, ciphertext: &Path) -> Result<Vec<String>> {
        ensure_exists(ciphertext)?;
        Ok(self
            .registry
            .engine()
            .recipient_ids(ciphertext)?
            .iter()
            .map(|raw| KeyIdentifier::new(raw).short_form().to_string())
            .collect())
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PgpError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Remove the output a failed decryption created.
fn discard_partial(path: &Path) {
    if path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}

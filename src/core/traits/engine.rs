use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::import_outcome::{EngineOutcome, ImportOutcome};
use crate::core::models::key_identifier::Fingerprint;
use crate::core::models::key_record::KeyRecord;

/// Port for the external OpenPGP engine.
///
/// Implementations live in `adapters::engine` (e.g. `GpgEngine`).
/// Every call blocks until the engine returns. An `Err` means the engine
/// could not be driven at all; an engine that ran and refused reports
/// that through the returned outcome.
pub trait OpenPgpEngine {
    /// Import armored key material into the engine's keyring.
    fn import(&self, material: &str) -> Result<ImportOutcome>;

    /// Mark a key as ultimately trusted.
    fn trust(&self, fingerprint: &Fingerprint) -> Result<()>;

    /// List public (or, with `secret`, secret) keys.
    fn list_keys(&self, secret: bool) -> Result<Vec<KeyRecord>>;

    /// Encrypt `input` to `recipient` as ASCII armor written to `output`.
    fn encrypt_file(&self, input: &Path, output: &Path, recipient: &str)
    -> Result<EngineOutcome>;

    /// Decrypt `input`, writing to `output` or returning the plaintext in
    /// `EngineOutcome::data` when no output path is given.
    fn decrypt_file(
        &self,
        input: &Path,
        output: Option<&Path>,
        passphrase: &str,
    ) -> Result<EngineOutcome>;

    /// Key IDs listed in the ciphertext header, in the order they appear.
    fn recipient_ids(&self, ciphertext: &Path) -> Result<Vec<String>>;

    /// Human-readable name of this engine (e.g. "gpg").
    fn name(&self) -> &str;
}

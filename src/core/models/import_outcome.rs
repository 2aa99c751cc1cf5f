use serde::Serialize;

use super::key_identifier::Fingerprint;

/// Counters reported by the engine after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Keys found in the supplied material.
    pub considered: u32,
    /// Public keys newly added to the keyring.
    pub imported: u32,
    /// Public keys already present and left unchanged.
    pub unchanged: u32,
    pub secret_read: u32,
    pub secret_imported: u32,
    pub secret_unchanged: u32,
}

/// Result of handing key material to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// One entry per successful import record, in engine order.
    /// A secret key usually yields its fingerprint more than once.
    pub fingerprints: Vec<Fingerprint>,
    pub summary: ImportSummary,
    /// Raw engine diagnostics, kept for error messages.
    pub diagnostic: String,
}

impl ImportOutcome {
    /// The fingerprint of the first successful import record.
    pub fn primary(&self) -> Option<&Fingerprint> {
        self.fingerprints.first()
    }
}

/// Result of an engine transform (encrypt or decrypt).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutcome {
    pub ok: bool,
    pub diagnostic: String,
    /// Output bytes when the caller asked for them in memory.
    pub data: Vec<u8>,
}

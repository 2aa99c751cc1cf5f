use std::path::PathBuf;

/// All domain errors for pgpcrypto.
///
/// Engine diagnostics are carried verbatim so the failing identifier
/// (or passphrase problem) can be read straight from the message.
#[derive(Debug, thiserror::Error)]
pub enum PgpError {
    #[error("Unable to import {kind} PGP key: {reason}")]
    Import { kind: &'static str, reason: String },

    #[error("Missing configuration: {detail}")]
    Configuration { detail: String },

    #[error("Unable to decrypt file {path}: {detail}")]
    Resolution { path: PathBuf, detail: String },

    #[error("Unable to encrypt file: {reason}")]
    Encryption { reason: String },

    #[error("Unable to decrypt file: {reason}")]
    Decryption { reason: String },

    #[error(
        "OpenPGP engine unavailable: {reason}\n\n  \
         Check that GnuPG is installed and that [engine].gpg_binary points to it."
    )]
    EngineUnavailable { reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PgpError>;

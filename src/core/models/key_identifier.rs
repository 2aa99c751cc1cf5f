use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::core::errors::{PgpError, Result};

static FINGERPRINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-F]{40}$").expect("fingerprint pattern is valid"));

/// Minimum length of a string that can name a key (a short key ID).
pub const SHORT_ID_LEN: usize = 8;

/// Length of a long key ID.
pub const LONG_ID_LEN: usize = 16;

/// Canonical 40-hex identifier of an OpenPGP key, stored uppercase.
///
/// The public and secret halves of one key pair share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a fingerprint as reported by the engine. Whitespace is
    /// stripped and hex is uppercased before validation.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        if !FINGERPRINT_RE.is_match(&normalized) {
            return Err(PgpError::Import {
                kind: "key",
                reason: format!("engine reported a malformed fingerprint '{raw}'"),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing 16 hex characters.
    pub fn long_id(&self) -> KeyIdentifier {
        KeyIdentifier::new(&self.0[self.0.len() - LONG_ID_LEN..])
    }

    /// Trailing 8 hex characters.
    pub fn short_id(&self) -> KeyIdentifier {
        KeyIdentifier::new(&self.0[self.0.len() - SHORT_ID_LEN..])
    }

    /// The fingerprint itself as an identifier.
    pub fn as_identifier(&self) -> KeyIdentifier {
        KeyIdentifier::new(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Any string a ciphertext or the engine may use to reference a key.
///
/// Several identifiers denote the same logical key. Values are trimmed and
/// uppercased so that `75188ed1` and `75188ED1` bind to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyIdentifier(String);

impl KeyIdentifier {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is long enough to name a key.
    pub fn is_usable(&self) -> bool {
        self.0.len() >= SHORT_ID_LEN
    }

    /// The trailing 8-character form. Identifiers shorter than that
    /// are returned unchanged.
    pub fn short_form(&self) -> Self {
        match self.0.len().checked_sub(SHORT_ID_LEN) {
            Some(start) => Self(self.0[start..].to_string()),
            None => self.clone(),
        }
    }

    /// The trailing 16-character form, if the identifier is at least that long.
    pub fn long_form(&self) -> Option<Self> {
        self.0
            .len()
            .checked_sub(LONG_ID_LEN)
            .map(|start| Self(self.0[start..].to_string()))
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

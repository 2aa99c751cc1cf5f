use chrono::{DateTime, Utc};
use serde::Serialize;

/// One subkey attached to a primary key, as listed by the engine.
///
/// Only `id` and `fingerprint` can appear as recipient tags in a
/// ciphertext. The keygrip is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubkeyRecord {
    pub id: Option<String>,
    pub fingerprint: Option<String>,
    pub keygrip: Option<String>,
}

/// A key as listed by the engine's keyring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRecord {
    /// Long (16 hex) ID of the primary key.
    pub key_id: String,
    pub fingerprint: Option<String>,
    pub user_ids: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    /// True when this record came from the secret keyring.
    pub secret: bool,
    pub subkeys: Vec<SubkeyRecord>,
}

impl KeyRecord {
    /// Whether this record's primary key is named by any of `ids`.
    pub fn matches_any(&self, ids: &[&str]) -> bool {
        ids.iter().any(|id| {
            self.key_id.eq_ignore_ascii_case(id)
                || self
                    .fingerprint
                    .as_deref()
                    .is_some_and(|f| f.eq_ignore_ascii_case(id))
        })
    }
}

impl std::fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.secret { "sec" } else { "pub" };
        let fpr = self.fingerprint.as_deref().unwrap_or(&self.key_id);
        write!(f, "{kind}  {fpr}")?;
        if let Some(uid) = self.user_ids.first() {
            write!(f, "  {uid}")?;
        }
        Ok(())
    }
}

use std::collections::BTreeSet;

use serde::Serialize;

use super::key_identifier::KeyIdentifier;
use super::key_record::KeyRecord;

/// Overall outcome of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionResult {
    Success,
    Failure,
}

/// Record returned to the caller of a session, with enough material
/// for caller-side verification of the round trip.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub result: SessionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pubkey_ids: BTreeSet<KeyIdentifier>,
    pub seckey_ids: BTreeSet<KeyIdentifier>,
    pub encrypted_content: Option<String>,
    pub decrypted_content: Option<String>,
    pub message_keys: Vec<String>,
    pub count_keys: usize,
    pub keys: Vec<KeyRecord>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl SessionReport {
    /// An empty report, filled in as the session progresses.
    pub fn started() -> Self {
        Self {
            result: SessionResult::Failure,
            error: None,
            pubkey_ids: BTreeSet::new(),
            seckey_ids: BTreeSet::new(),
            encrypted_content: None,
            decrypted_content: None,
            message_keys: Vec::new(),
            count_keys: 0,
            keys: Vec::new(),
            finished_at: chrono::Utc::now(),
        }
    }

    pub fn succeed(mut self) -> Self {
        self.result = SessionResult::Success;
        self.error = None;
        self.finished_at = chrono::Utc::now();
        self
    }

    pub fn fail(mut self, error: String) -> Self {
        self.result = SessionResult::Failure;
        self.error = Some(error);
        self.finished_at = chrono::Utc::now();
        self
    }
}

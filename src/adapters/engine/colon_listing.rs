//! Parser for `gpg --with-colons` key listings.
//!
//! Field layout (1-based): 1 record type, 5 key ID, 6 creation date,
//! 10 user ID / fingerprint / keygrip depending on the record type.
//! An `fpr` or `grp` record belongs to the key or subkey line just above it.

use chrono::{DateTime, Utc};

use crate::core::models::key_record::{KeyRecord, SubkeyRecord};

/// Parse a full colon listing into typed key records.
pub fn parse_listing(listing: &str) -> Vec<KeyRecord> {
    let mut keys: Vec<KeyRecord> = Vec::new();
    // Whether the last key/subkey line was a subkey.
    let mut in_subkey = false;

    for line in listing.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        let field = |n: usize| fields.get(n - 1).copied().filter(|v| !v.is_empty());

        match fields[0] {
            kind @ ("pub" | "sec") => {
                keys.push(KeyRecord {
                    key_id: field(5).unwrap_or_default().to_string(),
                    fingerprint: None,
                    user_ids: Vec::new(),
                    created: field(6).and_then(parse_timestamp),
                    secret: kind == "sec",
                    subkeys: Vec::new(),
                });
                in_subkey = false;
            }
            "sub" | "ssb" => {
                if let Some(key) = keys.last_mut() {
                    key.subkeys.push(SubkeyRecord {
                        id: field(5).map(str::to_string),
                        ..SubkeyRecord::default()
                    });
                    in_subkey = true;
                }
            }
            "fpr" => {
                if let (Some(key), Some(fpr)) = (keys.last_mut(), field(10)) {
                    match key.subkeys.last_mut().filter(|_| in_subkey) {
                        Some(sub) => sub.fingerprint = Some(fpr.to_string()),
                        None => key.fingerprint = Some(fpr.to_string()),
                    }
                }
            }
            "grp" => {
                let sub = keys
                    .last_mut()
                    .and_then(|k| k.subkeys.last_mut())
                    .filter(|_| in_subkey);
                if let (Some(sub), Some(grip)) = (sub, field(10)) {
                    sub.keygrip = Some(grip.to_string());
                }
            }
            "uid" => {
                if let (Some(key), Some(uid)) = (keys.last_mut(), field(10)) {
                    key.user_ids.push(unescape(uid));
                }
            }
            _ => {}
        }
    }

    keys
}

/// Creation dates are epoch seconds, or ISO 8601 on some builds.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match raw.parse::<i64>() {
        Ok(secs) => DateTime::from_timestamp(secs, 0),
        Err(_) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
    }
}

/// gpg escapes `:` and control characters in user IDs as `\xNN`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("\\x") {
        out.push_str(&rest[..pos]);
        let hex = rest.get(pos + 2..pos + 4);
        match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
            Some(byte) => {
                out.push(char::from(byte));
                rest = &rest[pos + 4..];
            }
            None => {
                out.push_str("\\x");
                rest = &rest[pos + 2..];
            }
        }
    }
    out.push_str(rest);
    out
}

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::core::errors::Result;
use crate::core::models::key_identifier::{Fingerprint, KeyIdentifier};
use crate::core::models::key_record::SubkeyRecord;
use crate::core::traits::engine::OpenPgpEngine;

/// Computes every identifier under which an imported key may be named
/// in a ciphertext's recipient list.
pub struct IdentityResolver<'a, E: OpenPgpEngine> {
    engine: &'a E,
}

impl<'a, E: OpenPgpEngine> IdentityResolver<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Expand a fingerprint into its full identifier set.
    ///
    /// Always contains the fingerprint, its long ID and its short ID. When
    /// the key is present in the engine's listing (the secret keyring when
    /// `secret` is set), every subkey's ID and fingerprint are added along
    /// with their long and short forms.
    ///
    /// A key missing from the listing is not an error: the three primary
    /// forms are returned and a warning is logged.
    pub fn expand(
        &self,
        fingerprint: &Fingerprint,
        secret: bool,
    ) -> Result<BTreeSet<KeyIdentifier>> {
        let mut ids: BTreeSet<KeyIdentifier> = [
            fingerprint.as_identifier(),
            fingerprint.long_id(),
            fingerprint.short_id(),
        ]
        .into_iter()
        .collect();

        let long_id = fingerprint.long_id();
        let short_id = fingerprint.short_id();
        let primary_forms = [fingerprint.as_str(), long_id.as_str(), short_id.as_str()];

        let listing = self.engine.list_keys(secret)?;
        let Some(record) = listing.iter().find(|k| k.matches_any(&primary_forms)) else {
            warn!(
                fingerprint = %fingerprint,
                secret,
                "key not found in engine listing; subkey identifiers not expanded"
            );
            return Ok(ids);
        };

        for subkey in &record.subkeys {
            ids.extend(subkey_identifiers(subkey));
        }

        debug!(fingerprint = %fingerprint, count = ids.len(), "expanded key identifiers");
        Ok(ids)
    }
}

/// Identifier forms carried by one subkey. The keygrip is an agent-side
/// handle and never names a recipient, so it is not included.
fn subkey_identifiers(subkey: &SubkeyRecord) -> Vec<KeyIdentifier> {
    [subkey.id.as_deref(), subkey.fingerprint.as_deref()]
        .into_iter()
        .flatten()
        .map(KeyIdentifier::new)
        .filter(KeyIdentifier::is_usable)
        .flat_map(|id| {
            let mut forms = vec![id.short_form()];
            forms.extend(id.long_form());
            forms.push(id);
            forms
        })
        .collect()
}

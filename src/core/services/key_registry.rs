use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::errors::{PgpError, Result};
use crate::core::models::import_outcome::{ImportOutcome, ImportSummary};
use crate::core::models::key_identifier::{Fingerprint, KeyIdentifier};
use crate::core::models::key_record::KeyRecord;
use crate::core::services::identity_resolver::IdentityResolver;
use crate::core::traits::engine::OpenPgpEngine;

/// Keys imported during one session, and what they are bound to.
///
/// Owns the engine so that the bindings and the keyring they describe
/// always live and die together. A registry is never shared across
/// sessions.
pub struct KeyRegistry<E: OpenPgpEngine> {
    engine: E,
    default_recipient: Option<String>,
    recipients: HashMap<String, Fingerprint>,
    passphrases: HashMap<KeyIdentifier, Zeroizing<String>>,
}

impl<E: OpenPgpEngine> KeyRegistry<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            default_recipient: None,
            recipients: HashMap::new(),
            passphrases: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Import and trust a public key.
    ///
    /// The key is bound to `label` (or to its fingerprint when no label is
    /// given). That label becomes the default recipient when `set_default`
    /// is true or when no default exists yet.
    pub fn import_public(
        &mut self,
        material: &str,
        label: Option<&str>,
        set_default: bool,
    ) -> Result<(Fingerprint, BTreeSet<KeyIdentifier>)> {
        let fingerprint = self.import_and_trust(material, "public")?;

        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => fingerprint.to_string(),
        };
        self.recipients.insert(label.clone(), fingerprint.clone());

        if set_default || self.default_recipient.is_none() {
            info!(recipient = %label, "default recipient set");
            self.default_recipient = Some(label);
        }

        let ids = IdentityResolver::new(&self.engine).expand(&fingerprint, false)?;
        Ok((fingerprint, ids))
    }

    /// Import and trust a secret key, binding every identifier it may be
    /// named by to `passphrase`. Re-importing refreshes the passphrase.
    pub fn import_secret(
        &mut self,
        material: &str,
        passphrase: &str,
    ) -> Result<BTreeSet<KeyIdentifier>> {
        if passphrase.is_empty() {
            return Err(PgpError::Configuration {
                detail: "a passphrase is required to import a secret key".into(),
            });
        }

        let fingerprint = self.import_and_trust(material, "secret")?;
        let ids = IdentityResolver::new(&self.engine).expand(&fingerprint, true)?;

        for id in &ids {
            self.passphrases
                .insert(id.clone(), Zeroizing::new(passphrase.to_string()));
        }
        debug!(
            fingerprint = %fingerprint,
            bindings = ids.len(),
            "passphrase bound to key identifiers"
        );
        Ok(ids)
    }

    /// Import a key file without binding it to a label or passphrase.
    pub fn import_key_file(&self, path: &Path) -> Result<ImportSummary> {
        if !path.exists() {
            return Err(PgpError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let material = std::fs::read_to_string(path)?;
        let outcome = self.engine.import(&material)?;
        Ok(outcome.summary)
    }

    /// The label used when encryption names no recipient.
    pub fn resolve_default_recipient(&self) -> Option<&str> {
        self.default_recipient.as_deref()
    }

    /// The identifier to hand the engine for `label`: the bound
    /// fingerprint for known labels, the label itself otherwise.
    pub fn resolve_recipient(&self, label: &str) -> String {
        self.recipients
            .get(label)
            .map(|f| f.to_string())
            .unwrap_or_else(|| label.to_string())
    }

    /// The passphrase bound to `id`, if any.
    pub fn lookup_passphrase(&self, id: &KeyIdentifier) -> Option<&str> {
        self.passphrases
            .get(&KeyIdentifier::new(id.as_str()))
            .map(|p| p.as_str())
    }

    /// Public and secret keys currently in the engine's keyring.
    pub fn list_keys(&self) -> Result<Vec<KeyRecord>> {
        let mut keys = self.engine.list_keys(false)?;
        keys.extend(self.engine.list_keys(true)?);
        Ok(keys)
    }

    pub fn count_keys(&self) -> Result<usize> {
        Ok(self.list_keys()?.len())
    }

    fn import_and_trust(&self, material: &str, kind: &'static str) -> Result<Fingerprint> {
        let outcome: ImportOutcome = self.engine.import(material)?;
        let Some(fingerprint) = outcome.primary().cloned() else {
            return Err(PgpError::Import {
                kind,
                reason: outcome.diagnostic,
            });
        };

        self.engine.trust(&fingerprint)?;
        info!(
            kind,
            fingerprint = %fingerprint,
            imported = outcome.summary.imported + outcome.summary.secret_imported,
            "key imported"
        );
        Ok(fingerprint)
    }
}

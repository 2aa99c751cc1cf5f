use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::context::{Session, read_key_file, require_passphrase};
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::import_outcome::ImportSummary;
use crate::core::models::key_identifier::KeyIdentifier;
use crate::core::models::key_record::KeyRecord;

#[derive(Debug, Serialize)]
struct ImportedKey {
    path: PathBuf,
    secret: bool,
    summary: ImportSummary,
    identifiers: BTreeSet<KeyIdentifier>,
}

#[derive(Debug, Serialize)]
struct Inspection {
    imported: Vec<ImportedKey>,
    count_keys: usize,
    keys: Vec<KeyRecord>,
}

/// Execute the `pgpcrypto inspect` command.
///
/// Each file is imported twice: once as a plain key file to report the
/// engine's import counters, then through the registry to compute the
/// identifiers it can be addressed by.
pub fn execute(
    public_keys: &[PathBuf],
    secret_key: Option<&Path>,
    passphrase: Option<&str>,
    json: bool,
    config: &AppConfig,
    gpg: Option<&str>,
) -> Result<()> {
    let mut session = Session::open(config, gpg)?;
    let registry = &mut session.service.registry;
    let mut imported = Vec::new();

    for path in public_keys {
        let summary = registry.import_key_file(path)?;
        let (_, identifiers) = registry.import_public(&read_key_file(path)?, None, false)?;
        imported.push(ImportedKey {
            path: path.clone(),
            secret: false,
            summary,
            identifiers,
        });
    }

    if let Some(path) = secret_key {
        let passphrase = require_passphrase(passphrase)?;
        let summary = registry.import_key_file(path)?;
        let identifiers = registry.import_secret(&read_key_file(path)?, passphrase)?;
        imported.push(ImportedKey {
            path: path.to_path_buf(),
            secret: true,
            summary,
            identifiers,
        });
    }

    let keys = registry.list_keys()?;
    let inspection = Inspection {
        imported,
        count_keys: keys.len(),
        keys,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print_inspection(&inspection);
    }

    session.close()
}

fn print_inspection(inspection: &Inspection) {
    for key in &inspection.imported {
        let kind = if key.secret { "secret" } else { "public" };
        output::header(&format!("{} ({kind})", key.path.display()));
        println!(
            "  keys found: {}, public imported: {}, secret imported: {}",
            key.summary.considered, key.summary.imported, key.summary.secret_imported
        );
        for id in &key.identifiers {
            println!("  • {id}");
        }
    }

    output::header(&format!("Keyring ({} keys)", inspection.count_keys));
    for key in &inspection.keys {
        println!("  {key}");
        for sub in &key.subkeys {
            if let Some(id) = &sub.id {
                println!("    sub  {id}");
            }
        }
    }
}

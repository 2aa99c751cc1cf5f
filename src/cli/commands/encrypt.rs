use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::context::{Session, read_key_file};
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{PgpError, Result};

/// Options for `pgpcrypto encrypt`.
pub struct EncryptArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub public_keys: &'a [PathBuf],
    pub labels: &'a [String],
    pub default_label: Option<&'a str>,
    pub recipient: Option<&'a str>,
}

/// Execute the `pgpcrypto encrypt` command.
///
/// Imports every public key into a fresh session, then encrypts `input`
/// to the requested recipient (or the default one) as ASCII armor.
pub fn execute(args: &EncryptArgs<'_>, config: &AppConfig, gpg: Option<&str>) -> Result<()> {
    if args.labels.len() > args.public_keys.len() {
        return Err(PgpError::Configuration {
            detail: format!(
                "{} label(s) given for {} public key(s)",
                args.labels.len(),
                args.public_keys.len()
            ),
        });
    }
    if let Some(default) = args.default_label
        && !args.labels.iter().any(|l| l == default)
    {
        return Err(PgpError::Configuration {
            detail: format!("default label '{default}' matches no --label"),
        });
    }
    if !args.input.exists() {
        return Err(PgpError::FileNotFound {
            path: args.input.to_path_buf(),
        });
    }

    let mut session = Session::open(config, gpg)?;
    let registry = &mut session.service.registry;

    for (i, path) in args.public_keys.iter().enumerate() {
        let material = read_key_file(path)?;
        let label = args.labels.get(i).map(String::as_str);
        let set_default = label.is_some() && label == args.default_label;
        let (fingerprint, _) = registry.import_public(&material, label, set_default)?;
        output::detail(&format!(
            "Imported {} as {}",
            fingerprint,
            label.unwrap_or(fingerprint.as_str())
        ));
    }

    let recipient = args
        .recipient
        .or(registry.resolve_default_recipient())
        .map(str::to_string);

    let sp = output::spinner(&format!(
        "Encrypting {} for {}...",
        args.input.display(),
        recipient.as_deref().unwrap_or("<none>")
    ));
    let result = session
        .service
        .encrypt_file(args.input, args.output, recipient.as_deref());
    sp.finish_and_clear();
    result?;

    info!(output = %args.output.display(), "file encrypted");
    output::success(&format!(
        "Encrypted {} -> {}",
        args.input.display(),
        args.output.display()
    ));

    session.close()
}

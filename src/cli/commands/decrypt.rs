use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::context::{Session, read_key_file, require_passphrase};
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{PgpError, Result};

/// Execute the `pgpcrypto decrypt` command.
///
/// Imports the secret key(s) with the passphrase, then decrypts `input`
/// using the passphrase bound to the ciphertext's first recipient ID.
/// Plaintext goes to `output`, or to stdout when no output is given.
pub fn execute(
    input: &Path,
    output_path: Option<&Path>,
    secret_keys: &[PathBuf],
    passphrase: Option<&str>,
    config: &AppConfig,
    gpg: Option<&str>,
) -> Result<()> {
    if !input.exists() {
        return Err(PgpError::FileNotFound {
            path: input.to_path_buf(),
        });
    }
    let passphrase = require_passphrase(passphrase)?;

    let mut session = Session::open(config, gpg)?;
    for path in secret_keys {
        let material = read_key_file(path)?;
        let ids = session.service.registry.import_secret(&material, passphrase)?;
        output::detail(&format!(
            "Imported secret key {} ({} identifiers)",
            path.display(),
            ids.len()
        ));
    }

    let ids = session.service.recipient_ids(input)?;
    output::detail(&format!("Recipients: {}", ids.join(", ")));

    let sp = output::spinner(&format!("Decrypting {}...", input.display()));
    let result = session.service.decrypt_file(input, output_path);
    sp.finish_and_clear();

    match result? {
        Some(plaintext) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
        }
        None => {
            if let Some(path) = output_path {
                info!(output = %path.display(), "file decrypted");
                output::success(&format!("Decrypted {} -> {}", input.display(), path.display()));
            }
        }
    }

    session.close()
}

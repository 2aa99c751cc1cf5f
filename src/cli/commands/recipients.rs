use std::path::Path;

use crate::cli::context::Session;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;

/// Execute the `pgpcrypto recipients` command.
///
/// Prints one key ID per line, in the order the ciphertext lists them.
/// No keys are needed: the IDs are in the cleartext header.
pub fn execute(ciphertext: &Path, config: &AppConfig, gpg: Option<&str>) -> Result<()> {
    let session = Session::open(config, gpg)?;
    let ids = session.service.recipient_ids(ciphertext)?;

    if ids.is_empty() {
        output::warning(&format!("No recipient key IDs found in {}", ciphertext.display()));
    }
    for id in &ids {
        println!("{id}");
    }

    session.close()
}

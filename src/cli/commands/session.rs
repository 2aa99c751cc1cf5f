use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::cli::context::{Session, read_key_file};
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{PgpError, Result};
use crate::core::models::session_report::SessionReport;
use crate::core::traits::secret_source::SecretSource;

/// First line of every armored message.
pub const ARMOR_BEGIN: &str = "-----BEGIN PGP MESSAGE-----";
/// Last line of every armored message, including its newline.
pub const ARMOR_END: &str = "-----END PGP MESSAGE-----\n";

/// Options for `pgpcrypto session`.
pub struct SessionArgs<'a> {
    pub input: &'a Path,
    pub public_key: Option<&'a Path>,
    pub secret_key: Option<&'a Path>,
    pub passphrase: Option<&'a str>,
    pub recipient: Option<&'a str>,
    pub report: Option<&'a Path>,
}

/// Everything a session needs before it touches the engine.
struct SessionInputs {
    recipient: String,
    passphrase: zeroize::Zeroizing<String>,
    public_key: String,
    secret_key: String,
}

/// Execute the `pgpcrypto session` command.
///
/// Imports the public key as default recipient, encrypts the input,
/// imports the secret key, decrypts the result and reports everything as
/// JSON. The report is written on failure too, with `result: FAILURE`.
pub fn execute(args: &SessionArgs<'_>, config: &AppConfig, gpg: Option<&str>) -> Result<()> {
    let source = config.secret_source();
    let report = match gather_inputs(args, config, source.as_ref()) {
        Ok(inputs) => run(args.input, &inputs, config, gpg),
        Err(e) => Err((SessionReport::started(), e)),
    };

    let (report, outcome) = match report {
        Ok(report) => (report.succeed(), Ok(())),
        Err((report, e)) => {
            error!(error = %e, "session failed");
            (report.fail(e.to_string()), Err(e))
        }
    };

    let json = serde_json::to_string_pretty(&report)?;
    match args.report {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            output::success(&format!("Report written to {}", path.display()));
        }
        None => println!("{json}"),
    }

    outcome
}

/// Resolve session inputs: CLI flags first, then the secret source, then
/// the configured fallback recipient.
fn gather_inputs(
    args: &SessionArgs<'_>,
    config: &AppConfig,
    source: &dyn SecretSource,
) -> Result<SessionInputs> {
    let names = &config.secrets;
    let from_file_or_secret = |path: Option<&Path>, name: &str| -> Result<Option<String>> {
        match path {
            Some(p) => read_key_file(p).map(Some),
            None => Ok(source.get(name)),
        }
    };
    let missing = |what: &str, name: &str| PgpError::Configuration {
        detail: format!(
            "no {what} given and secret '{name}' not found in {} source",
            source.name()
        ),
    };

    let recipient = args
        .recipient
        .map(str::to_string)
        .or_else(|| source.get(&names.recipient))
        .map(|r| r.trim().to_string())
        .unwrap_or_else(|| config.session.fallback_recipient.clone());

    let passphrase = args
        .passphrase
        .map(str::to_string)
        .or_else(|| source.get(&names.passphrase))
        .map(|p| p.trim_end_matches(['\r', '\n']).to_string())
        .ok_or_else(|| missing("passphrase", &names.passphrase))?;

    let public_key = from_file_or_secret(args.public_key, &names.public_key)?
        .ok_or_else(|| missing("public key", &names.public_key))?;
    let secret_key = from_file_or_secret(args.secret_key, &names.secret_key)?
        .ok_or_else(|| missing("secret key", &names.secret_key))?;

    Ok(SessionInputs {
        recipient,
        passphrase: zeroize::Zeroizing::new(passphrase),
        public_key,
        secret_key,
    })
}

/// Run the round trip. On failure the partially filled report is
/// returned alongside the error.
fn run(
    input: &Path,
    inputs: &SessionInputs,
    config: &AppConfig,
    gpg: Option<&str>,
) -> std::result::Result<SessionReport, (SessionReport, PgpError)> {
    let mut report = SessionReport::started();
    let mut session = match Session::open(config, gpg) {
        Ok(s) => s,
        Err(e) => return Err((report, e)),
    };

    let result = round_trip(input, inputs, &mut session, &mut report);
    let closed = session.close();

    match (result, closed) {
        (Ok(()), Ok(())) => Ok(report),
        (Err(e), _) | (Ok(()), Err(e)) => Err((report, e)),
    }
}

fn round_trip(
    input: &Path,
    inputs: &SessionInputs,
    session: &mut Session,
    report: &mut SessionReport,
) -> Result<()> {
    let encrypted_path: PathBuf = session.workspace().file("encrypted_file.pgp");
    let decrypted_path: PathBuf = session.workspace().file("decrypted_file.txt");

    let (_, pubkey_ids) =
        session
            .service
            .registry
            .import_public(&inputs.public_key, Some(&inputs.recipient), true)?;
    report.pubkey_ids = pubkey_ids;

    let sp = output::spinner(&format!("Encrypting {}...", input.display()));
    let encrypted = session.service.encrypt_file(input, &encrypted_path, None);
    sp.finish_and_clear();
    encrypted?;

    let encrypted = std::fs::read_to_string(&encrypted_path)?;
    if !encrypted.starts_with(ARMOR_BEGIN) || !encrypted.ends_with(ARMOR_END) {
        return Err(PgpError::Encryption {
            reason: "engine output is not an ASCII-armored PGP message".into(),
        });
    }
    report.encrypted_content = Some(encrypted);
    output::success("Encrypted to default recipient");

    report.seckey_ids = session
        .service
        .registry
        .import_secret(&inputs.secret_key, &inputs.passphrase)?;

    let sp = output::spinner("Decrypting...");
    let decrypted = session
        .service
        .decrypt_file(&encrypted_path, Some(&decrypted_path));
    sp.finish_and_clear();
    decrypted?;

    report.decrypted_content = Some(std::fs::read_to_string(&decrypted_path)?);
    output::success("Decrypted round trip");

    report.message_keys = session.service.recipient_ids(&encrypted_path)?;
    report.keys = session.service.registry.list_keys()?;
    report.count_keys = session.service.registry.count_keys()?;

    info!(
        message_keys = ?report.message_keys,
        count_keys = report.count_keys,
        "session round trip complete"
    );
    Ok(())
}

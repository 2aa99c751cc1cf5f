mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use config::app_config::AppConfig;

fn main() {
    let args = Cli::parse();

    let filter = EnvFilter::try_from_env("PGPCRYPTO_LOG").unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("pgpcrypto=debug")
        } else {
            EnvFilter::new("pgpcrypto=warn")
        }
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    cli::output::set_quiet(args.quiet);

    let result = AppConfig::load(args.config.as_deref()).and_then(|config| {
        let gpg = args.gpg.as_deref();
        match &args.command {
            Commands::Encrypt {
                input,
                output,
                public_keys,
                labels,
                default_label,
                recipient,
            } => cli::commands::encrypt::execute(
                &cli::commands::encrypt::EncryptArgs {
                    input,
                    output,
                    public_keys,
                    labels,
                    default_label: default_label.as_deref(),
                    recipient: recipient.as_deref(),
                },
                &config,
                gpg,
            ),
            Commands::Decrypt {
                input,
                output,
                secret_keys,
                passphrase,
            } => cli::commands::decrypt::execute(
                input,
                output.as_deref(),
                secret_keys,
                passphrase.as_deref(),
                &config,
                gpg,
            ),
            Commands::Recipients { ciphertext } => {
                cli::commands::recipients::execute(ciphertext, &config, gpg)
            }
            Commands::Inspect {
                public_keys,
                secret_key,
                passphrase,
                json,
            } => cli::commands::inspect::execute(
                public_keys,
                secret_key.as_deref(),
                passphrase.as_deref(),
                *json,
                &config,
                gpg,
            ),
            Commands::Session {
                input,
                public_key,
                secret_key,
                passphrase,
                recipient,
                report,
            } => cli::commands::session::execute(
                &cli::commands::session::SessionArgs {
                    input,
                    public_key: public_key.as_deref(),
                    secret_key: secret_key.as_deref(),
                    passphrase: passphrase.as_deref(),
                    recipient: recipient.as_deref(),
                    report: report.as_deref(),
                },
                &config,
                gpg,
            ),
        }
    });

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Session-scoped OpenPGP key registry and file encryption.
///
/// Every invocation imports its keys into a fresh private keyring that is
/// removed when the command finishes.
#[derive(Parser, Debug)]
#[command(name = "pgpcrypto", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the gpg binary (overrides [engine].gpg_binary)
    #[arg(long, global = true, env = "PGPCRYPTO_GPG")]
    pub gpg: Option<String>,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt a file to a recipient
    Encrypt {
        /// Plaintext file to encrypt
        input: PathBuf,
        /// Where to write the ASCII-armored ciphertext
        output: PathBuf,
        /// Armored public key file to import (repeatable)
        #[arg(long = "public-key", required = true)]
        public_keys: Vec<PathBuf>,
        /// Label for the public key at the same position (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Make the key with this label the default recipient
        #[arg(long)]
        default_label: Option<String>,
        /// Recipient label, key ID or fingerprint (default: first key)
        #[arg(long)]
        recipient: Option<String>,
    },

    /// Decrypt a file with an imported secret key
    Decrypt {
        /// Ciphertext file to decrypt
        input: PathBuf,
        /// Where to write the plaintext (default: stdout)
        output: Option<PathBuf>,
        /// Armored secret key file to import (repeatable)
        #[arg(long = "secret-key", required = true)]
        secret_keys: Vec<PathBuf>,
        /// Passphrase that unlocks the secret key(s)
        #[arg(long, env = "PGPCRYPTO_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// List the recipient key IDs embedded in a ciphertext
    Recipients {
        /// Ciphertext file to inspect
        ciphertext: PathBuf,
    },

    /// Import keys into a throwaway keyring and show their identifiers
    Inspect {
        /// Armored public key file (repeatable)
        #[arg(long = "public-key")]
        public_keys: Vec<PathBuf>,
        /// Armored secret key file
        #[arg(long = "secret-key")]
        secret_key: Option<PathBuf>,
        /// Passphrase for the secret key
        #[arg(long, env = "PGPCRYPTO_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a full encrypt/decrypt round trip and emit a JSON report
    Session {
        /// Plaintext file to round-trip
        #[arg(long)]
        input: PathBuf,
        /// Armored public key file (default: from the secret source)
        #[arg(long = "public-key")]
        public_key: Option<PathBuf>,
        /// Armored secret key file (default: from the secret source)
        #[arg(long = "secret-key")]
        secret_key: Option<PathBuf>,
        /// Passphrase for the secret key (default: from the secret source)
        #[arg(long, env = "PGPCRYPTO_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
        /// Recipient label (default: from the secret source, then config)
        #[arg(long)]
        recipient: Option<String>,
        /// Write the report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

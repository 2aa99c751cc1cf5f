//! Shared helpers for pgpcrypto integration tests.
//!
//! Keys are generated once per test in a private GNUPGHOME, exported as
//! armored files, and the generating keyring is discarded with the fixture.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::TempDir;
use assert_fs::prelude::*;

/// Passphrase protecting every generated secret key.
pub const PASSPHRASE: &str = "Passphrase12345";

/// Content round-tripped by the session tests.
pub const PLAINTEXT: &str = "Hello World!";

/// Skip a test if gpg is not installed.
#[macro_export]
macro_rules! skip_without_gpg {
    () => {
        if std::process::Command::new("gpg")
            .arg("--version")
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(true)
        {
            eprintln!("SKIPPED: gpg not installed");
            return;
        }
    };
}

/// `pgpcrypto` isolated from any user config.
pub fn pgpcrypto(dir: &TempDir) -> assert_cmd::Command {
    let config = dir.child("config.toml");
    if !config.path().exists() {
        let root = dir.child("sessions");
        root.create_dir_all().unwrap();
        config
            .write_str(&format!(
                "[engine]\nworkspace_root = {:?}\n",
                root.path().display().to_string()
            ))
            .unwrap();
    }

    let mut cmd = cargo_bin_cmd!("pgpcrypto");
    cmd.arg("--config")
        .arg(config.path())
        .env_remove("PGPCRYPTO_PASSPHRASE")
        .env_remove("PGPCRYPTO_PUBLIC_KEY")
        .env_remove("PGPCRYPTO_PRIVATE_KEY")
        .env_remove("PGPCRYPTO_RECIPIENT")
        .env_remove("PGPCRYPTO_GPG")
        .env_remove("PGPCRYPTO_LOG");
    cmd
}

/// An exported key pair: ed25519 primary for signing, cv25519 subkey for
/// encryption.
pub struct KeyPair {
    pub public: PathBuf,
    pub secret: PathBuf,
    pub fingerprint: String,
    /// Fingerprint of the encryption subkey.
    pub subkey_fingerprint: String,
}

fn gpg(home: &Path) -> Command {
    let mut cmd = Command::new("gpg");
    cmd.arg("--homedir").arg(home).args(["--batch", "--no-tty"]);
    cmd
}

fn run(cmd: &mut Command, what: &str) -> Vec<u8> {
    let output = cmd.output().unwrap_or_else(|e| panic!("{what}: {e}"));
    assert!(
        output.status.success(),
        "{what} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output.stdout
}

/// Generate a passphrase-protected key pair and export it into `dir`.
pub fn generate_key_pair(dir: &TempDir, name: &str, email: &str) -> KeyPair {
    let slug = name.to_ascii_lowercase().replace(' ', "-");
    let home = dir.child(format!("{slug}-gnupg"));
    home.create_dir_all().unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(home.path(), std::fs::Permissions::from_mode(0o700)).unwrap();
    }

    let params = format!(
        "Key-Type: eddsa\n\
         Key-Curve: ed25519\n\
         Key-Usage: sign\n\
         Subkey-Type: ecdh\n\
         Subkey-Curve: cv25519\n\
         Subkey-Usage: encrypt\n\
         Name-Real: {name}\n\
         Name-Email: {email}\n\
         Expire-Date: 0\n\
         Passphrase: {PASSPHRASE}\n\
         %commit\n"
    );
    let batch = home.child("gen-key-batch");
    batch.write_str(&params).unwrap();

    run(
        gpg(home.path())
            .args(["--pinentry-mode", "loopback", "--gen-key"])
            .arg(batch.path()),
        "key generation",
    );

    let listing = run(
        gpg(home.path())
            .args(["--with-colons", "--with-fingerprint", "--with-fingerprint"])
            .args(["--list-keys", email]),
        "key listing",
    );
    let listing = String::from_utf8_lossy(&listing);
    let mut fprs = listing
        .lines()
        .filter(|line| line.starts_with("fpr:"))
        .filter_map(|line| line.split(':').nth(9))
        .map(str::to_string);
    let fingerprint = fprs.next().expect("failed to extract fingerprint");
    let subkey_fingerprint = fprs.next().expect("failed to extract subkey fingerprint");

    let public = run(
        gpg(home.path()).args(["--armor", "--export", email]),
        "public key export",
    );
    let secret = run(
        gpg(home.path())
            .args(["--pinentry-mode", "loopback", "--passphrase", PASSPHRASE])
            .args(["--armor", "--export-secret-keys", email]),
        "secret key export",
    );

    let _ = Command::new("gpgconf")
        .args(["--kill", "all"])
        .env("GNUPGHOME", home.path())
        .output();

    let public_path = dir.child(format!("{slug}.pub.asc"));
    public_path.write_binary(&public).unwrap();
    let secret_path = dir.child(format!("{slug}.sec.asc"));
    secret_path.write_binary(&secret).unwrap();

    KeyPair {
        public: public_path.path().to_path_buf(),
        secret: secret_path.path().to_path_buf(),
        fingerprint,
        subkey_fingerprint,
    }
}

/// The standard test pair used by most tests.
pub fn test_key_pair(dir: &TempDir) -> KeyPair {
    generate_key_pair(dir, "Test User", "test@pgpcrypto.local")
}

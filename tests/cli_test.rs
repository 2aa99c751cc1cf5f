//! Argument and configuration errors that never reach gpg.

mod support;

use assert_fs::prelude::*;
use predicates::prelude::*;
use support::*;

#[test]
fn help_lists_commands() {
    let dir = assert_fs::TempDir::new().unwrap();

    pgpcrypto(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypt"))
        .stdout(predicate::str::contains("decrypt"))
        .stdout(predicate::str::contains("recipients"))
        .stdout(predicate::str::contains("session"));
}

#[test]
fn encrypt_requires_public_key() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("in.txt").write_str("data").unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["encrypt", "in.txt", "out.pgp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--public-key"));
}

#[test]
fn encrypt_missing_input_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["encrypt", "missing.txt", "out.pgp", "--public-key", "key.asc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));

    dir.child("out.pgp").assert(predicate::path::missing());
}

#[test]
fn encrypt_rejects_extra_labels() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("in.txt").write_str("data").unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["encrypt", "in.txt", "out.pgp", "--public-key", "key.asc"])
        .args(["--label", "one", "--label", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 label(s) given for 1 public key(s)"));
}

#[test]
fn encrypt_rejects_unknown_default_label() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("in.txt").write_str("data").unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["encrypt", "in.txt", "out.pgp", "--public-key", "key.asc"])
        .args(["--label", "ops", "--default-label", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default label 'dev' matches no --label"));
}

#[test]
fn decrypt_without_passphrase_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("in.pgp").write_str("ciphertext").unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["decrypt", "in.pgp", "--secret-key", "key.sec.asc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing configuration"))
        .stderr(predicate::str::contains("passphrase"));
}

#[test]
fn missing_engine_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("in.pgp").write_str("ciphertext").unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["--gpg", "/nonexistent/bin/gpg", "recipients", "in.pgp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OpenPGP engine unavailable"));
}

#[test]
fn explicit_config_must_exist() {
    assert_cmd::cargo::cargo_bin_cmd!("pgpcrypto")
        .args(["--config", "/nonexistent/pgpcrypto.toml", "recipients", "x.pgp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/pgpcrypto.toml"));
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("config.toml")
        .write_str("[engine]\ngpg = \"gpg2\"\n")
        .unwrap();

    pgpcrypto(&dir)
        .args(["recipients", "x.pgp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn session_without_secrets_reports_failure() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("in.txt").write_str(PLAINTEXT).unwrap();

    pgpcrypto(&dir)
        .current_dir(dir.path())
        .args(["session", "--input", "in.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"result\": \"FAILURE\""))
        .stdout(predicate::str::contains("pgpcrypto/passphrase"));
}

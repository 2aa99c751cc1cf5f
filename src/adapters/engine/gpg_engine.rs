use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{debug, trace};

use super::colon_listing::parse_listing;
use crate::core::errors::{PgpError, Result};
use crate::core::models::import_outcome::{EngineOutcome, ImportOutcome, ImportSummary};
use crate::core::models::key_identifier::Fingerprint;
use crate::core::models::key_record::KeyRecord;
use crate::core::traits::engine::OpenPgpEngine;

/// Prefix of machine-readable lines written to `--status-fd`.
const STATUS_PREFIX: &str = "[GNUPG:] ";

/// Ownertrust level 6 is "ultimate".
const ULTIMATE_TRUST: &str = "6";

/// OpenPGP engine that shells out to the system `gpg` binary.
///
/// Every invocation is pinned to one home directory, so keys imported
/// through one engine are invisible to any other.
pub struct GpgEngine {
    /// Path to the gpg binary (defaults to "gpg").
    gpg_path: PathBuf,
    /// Keyring directory passed as `--homedir`.
    home: PathBuf,
}

impl GpgEngine {
    /// Create an engine with a custom gpg binary path.
    pub fn with_path(gpg_path: PathBuf, home: PathBuf) -> Self {
        Self { gpg_path, home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Check if GPG is available on the system.
    pub fn is_available(&self) -> bool {
        Command::new(&self.gpg_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    /// Run gpg against this engine's home and return its raw output,
    /// whatever the exit status.
    fn run_gpg(&self, args: &[&str], stdin_data: Option<&[u8]>) -> Result<Output> {
        let mut cmd = Command::new(&self.gpg_path);
        cmd.arg("--homedir")
            .arg(&self.home)
            .args(["--batch", "--no-tty"])
            .args(args)
            .stdin(if stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        trace!(args = ?args, "running gpg");
        let mut child = cmd.spawn().map_err(|e| PgpError::EngineUnavailable {
            reason: format!("failed to run {}: {e}", self.gpg_path.display()),
        })?;

        if let Some(data) = stdin_data
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin
                .write_all(data)
                .map_err(|e| PgpError::EngineUnavailable {
                    reason: format!("failed to write to gpg stdin: {e}"),
                })?;
        }

        child
            .wait_with_output()
            .map_err(|e| PgpError::EngineUnavailable {
                reason: format!("gpg process failed: {e}"),
            })
    }

    /// Stop the gpg-agent spawned for this home, if any. Best effort.
    fn stop_agent(&self) {
        let gpgconf = match self.gpg_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join("gpgconf"),
            _ => PathBuf::from("gpgconf"),
        };
        let stopped = Command::new(&gpgconf)
            .arg("--homedir")
            .arg(&self.home)
            .args(["--kill", "all"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success());
        if !stopped {
            debug!(home = %self.home.display(), "gpg-agent not stopped");
        }
    }

    fn outcome(output: Output) -> EngineOutcome {
        EngineOutcome {
            ok: output.status.success(),
            diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            data: output.stdout,
        }
    }
}

/// Split status lines into `(keyword, arguments)` pairs.
fn status_lines(stdout: &[u8]) -> Vec<(String, Vec<String>)> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| line.strip_prefix(STATUS_PREFIX))
        .map(|rest| {
            let mut parts = rest.split_whitespace().map(str::to_string);
            let keyword = parts.next().unwrap_or_default();
            (keyword, parts.collect())
        })
        .collect()
}

/// Parse the `IMPORT_OK` and `IMPORT_RES` status lines of an import.
fn parse_import_status(stdout: &[u8]) -> (Vec<Fingerprint>, ImportSummary) {
    let mut fingerprints = Vec::new();
    let mut summary = ImportSummary::default();

    for (keyword, args) in status_lines(stdout) {
        match keyword.as_str() {
            "IMPORT_OK" => {
                if let Some(fpr) = args.get(1).and_then(|f| Fingerprint::parse(f).ok()) {
                    fingerprints.push(fpr);
                }
            }
            "IMPORT_RES" => {
                let n = |i: usize| args.get(i).and_then(|v| v.parse().ok()).unwrap_or(0);
                summary = ImportSummary {
                    considered: n(0),
                    imported: n(2),
                    unchanged: n(4),
                    secret_read: n(9),
                    secret_imported: n(10),
                    secret_unchanged: n(11),
                };
            }
            _ => {}
        }
    }

    (fingerprints, summary)
}

/// Key IDs from `ENC_TO` status lines, in order.
fn parse_enc_to(stdout: &[u8]) -> Vec<String> {
    status_lines(stdout)
        .into_iter()
        .filter(|(keyword, _)| keyword == "ENC_TO")
        .filter_map(|(_, args)| args.into_iter().next())
        .collect()
}

impl OpenPgpEngine for GpgEngine {
    fn import(&self, material: &str) -> Result<ImportOutcome> {
        let output = self.run_gpg(
            &["--yes", "--status-fd", "1", "--import"],
            Some(material.as_bytes()),
        )?;
        let (fingerprints, summary) = parse_import_status(&output.stdout);
        debug!(records = fingerprints.len(), ?summary, "gpg import finished");
        Ok(ImportOutcome {
            fingerprints,
            summary,
            diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn trust(&self, fingerprint: &Fingerprint) -> Result<()> {
        let line = format!("{fingerprint}:{ULTIMATE_TRUST}:\n");
        let output = self.run_gpg(&["--import-ownertrust"], Some(line.as_bytes()))?;
        if !output.status.success() {
            return Err(PgpError::Import {
                kind: "key",
                reason: format!(
                    "could not trust {fingerprint}: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }

    fn list_keys(&self, secret: bool) -> Result<Vec<KeyRecord>> {
        let list = if secret {
            "--list-secret-keys"
        } else {
            "--list-keys"
        };
        let output = self.run_gpg(
            &[
                "--with-colons",
                "--fixed-list-mode",
                "--with-fingerprint",
                // Given twice, gpg also prints subkey fingerprints.
                "--with-fingerprint",
                "--with-keygrip",
                list,
            ],
            None,
        )?;
        // An empty keyring exits non-zero on some gpg versions.
        Ok(parse_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    fn encrypt_file(&self, input: &Path, output: &Path, recipient: &str) -> Result<EngineOutcome> {
        let (input, output) = (path_arg(input)?, path_arg(output)?);
        let result = self.run_gpg(
            &[
                "--yes",
                "--armor",
                "--output",
                output,
                "--encrypt",
                "--recipient",
                recipient,
                input,
            ],
            None,
        )?;
        Ok(Self::outcome(result))
    }

    fn decrypt_file(
        &self,
        input: &Path,
        output: Option<&Path>,
        passphrase: &str,
    ) -> Result<EngineOutcome> {
        let input = path_arg(input)?;
        let mut args = vec![
            "--yes",
            "--pinentry-mode",
            "loopback",
            "--passphrase-fd",
            "0",
            "--trust-model",
            "always",
        ];
        if let Some(path) = output {
            args.extend(["--output", path_arg(path)?]);
        }
        args.extend(["--decrypt", input]);

        let stdin = zeroize::Zeroizing::new(format!("{passphrase}\n"));
        let result = self.run_gpg(&args, Some(stdin.as_bytes()))?;
        Ok(Self::outcome(result))
    }

    fn recipient_ids(&self, ciphertext: &Path) -> Result<Vec<String>> {
        let input = path_arg(ciphertext)?;
        let output = self.run_gpg(
            &["--status-fd", "1", "--list-only", "--decrypt", input],
            None,
        )?;
        Ok(parse_enc_to(&output.stdout))
    }

    fn name(&self) -> &str {
        "gpg"
    }
}

impl Drop for GpgEngine {
    fn drop(&mut self) {
        if self.home.is_dir() {
            self.stop_agent();
        }
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| PgpError::InvalidConfig {
        detail: format!("path is not valid UTF-8: {}", path.display()),
    })
}

use tracing::debug;

use crate::core::traits::secret_source::SecretSource;

/// Reads secrets from environment variables.
///
/// A secret name such as `pgpcrypto/public_key` maps to the variable
/// `PGPCRYPTO_PUBLIC_KEY`, preceded by the configured prefix if any.
pub struct EnvSecretSource {
    prefix: String,
}

impl EnvSecretSource {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Environment variable name for a secret.
    pub fn var_name(&self, name: &str) -> String {
        let mapped: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{mapped}", self.prefix)
    }
}

impl SecretSource for EnvSecretSource {
    fn get(&self, name: &str) -> Option<String> {
        let var = self.var_name(name);
        match std::env::var(&var) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            _ => {
                debug!(secret = name, var = %var, "secret not set");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "env"
    }
}

//! CLI configuration from the environment.
//!
//! Explicit command-line flags always win over these values.

use std::path::PathBuf;

use pod_crypto::PrivateKey;

/// Environment-provided defaults for the `pod` CLI.
///
/// Custom `Debug` implementation redacts the private key so the config can
/// be logged safely.
#[derive(Clone, Default)]
pub struct CliConfig {
    /// Private key text (hex or Base64) used by `sign` when `--key` is absent.
    pub private_key: Option<String>,
    /// Tracing filter directive; overrides `-v` when set.
    pub log_filter: Option<String>,
    /// Default output directory for `keygen`.
    pub output_dir: Option<PathBuf>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("log_filter", &self.log_filter)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `POD_PRIVATE_KEY` (optional)
    /// - `POD_LOG` (optional)
    /// - `POD_OUTPUT_DIR` (optional)
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        Self {
            private_key: get("POD_PRIVATE_KEY"),
            log_filter: get("POD_LOG"),
            output_dir: get("POD_OUTPUT_DIR").map(PathBuf::from),
        }
    }

    /// Parse `POD_PRIVATE_KEY`, if set.
    pub fn private_key(&self) -> Result<Option<PrivateKey>, ConfigError> {
        self.private_key
            .as_deref()
            .map(|text| {
                PrivateKey::from_text(text)
                    .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
            })
            .transpose()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("POD_PRIVATE_KEY is not a valid private key: {0}")]
    InvalidPrivateKey(String),
}

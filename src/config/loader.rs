//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::VerifierConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `blockchain.tenant_private_key`.
pub const TENANT_PRIVATE_KEY_ENV_VAR: &str = "BOOKING_VERIFIER_TENANT_PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, apply environment overrides to, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<VerifierConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content, std::env::var(TENANT_PRIVATE_KEY_ENV_VAR).ok())?;

    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}

/// Parse and validate configuration text.
///
/// `key_override` replaces the configured tenant private key when present.
pub fn parse_config(
    content: &str,
    key_override: Option<String>,
) -> Result<VerifierConfig, ConfigError> {
    let mut config: VerifierConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    if let Some(key) = key_override.filter(|k| !k.trim().is_empty()) {
        config.blockchain.tenant_private_key = Some(key);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

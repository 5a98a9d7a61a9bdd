//! Configuration and secret loading for Symptomix.
//!
//! Reads `config.toml` from the working directory and deserializes it into
//! [`AppConfig`], falling back to the reference defaults when the file is
//! missing or malformed. API keys are read strictly from the environment
//! and wrapped in [`SecretString`] so they never appear in Debug output or
//! logs; startup fails listing every missing variable at once.

use std::path::Path;

use secrecy::SecretString;

use symptomix_types::config::AppConfig;

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Environment variable holding the Pinecone API key.
pub const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";

/// Load configuration from `{dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config(dir: &Path) -> AppConfig {
    let config_path = dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// API keys for the external collaborators, resolved from the environment.
pub struct Secrets {
    pub groq_api_key: SecretString,
    pub pinecone_api_key: SecretString,
}

impl Secrets {
    /// Resolve both API keys, failing with one message naming every
    /// variable that is absent or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut missing = Vec::new();

        let groq = read_var(GROQ_API_KEY_VAR, &mut missing);
        let pinecone = read_var(PINECONE_API_KEY_VAR, &mut missing);

        if !missing.is_empty() {
            anyhow::bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
        }

        Ok(Self {
            groq_api_key: SecretString::from(groq.unwrap_or_default()),
            pinecone_api_key: SecretString::from(pinecone.unwrap_or_default()),
        })
    }
}

fn read_var(name: &'static str, missing: &mut Vec<&'static str>) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            missing.push(name);
            None
        }
    }
}

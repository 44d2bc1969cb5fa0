use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Looked up in order when no secrets file is given explicitly.
pub const DEFAULT_SECRETS_PATHS: [&str; 2] = [".streamlit/secrets.toml", "secrets.toml"];

pub const COHERE_API_KEY_ENV: &str = "COHERE_API_KEY";
pub const PINECONE_API_KEY_ENV: &str = "PINECONE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("secrets file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid secrets file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing secret '{key}': set it in the secrets file or via {env}")]
    Missing {
        key: &'static str,
        env: &'static str,
    },
}

/// API keys, read once at startup.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Secrets {
    #[serde(default)]
    cohere_api_key: Option<String>,
    #[serde(default)]
    pinecone_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("cohere_api_key", &self.cohere_api_key.as_ref().map(|_| "***"))
            .field(
                "pinecone_api_key",
                &self.pinecone_api_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

impl Secrets {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Reads the secrets file, then lets the environment override it.
    pub fn load(path: Option<&Path>, base_dir: &Path) -> Result<Self, ConfigError> {
        Ok(Self::discover(path, base_dir)?.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Reads the secrets file alone.
    ///
    /// An explicit `path` must exist. Without one the default locations are
    /// tried relative to `base_dir`, and finding none is not an error.
    pub fn discover(path: Option<&Path>, base_dir: &Path) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => DEFAULT_SECRETS_PATHS
                .iter()
                .map(|candidate| base_dir.join(candidate))
                .find(|candidate| candidate.exists()),
        };

        match file {
            Some(file) => {
                tracing::debug!(path = %file.display(), "loading secrets file");
                Self::from_file(&file)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(COHERE_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.cohere_api_key = Some(value);
        }
        if let Some(value) = lookup(PINECONE_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.pinecone_api_key = Some(value);
        }
        self
    }

    pub fn cohere_api_key(&self) -> Result<&str, ConfigError> {
        required(&self.cohere_api_key, "cohere_api_key", COHERE_API_KEY_ENV)
    }

    pub fn pinecone_api_key(&self) -> Result<&str, ConfigError> {
        required(
            &self.pinecone_api_key,
            "pinecone_api_key",
            PINECONE_API_KEY_ENV,
        )
    }
}

fn required<'a>(
    value: &'a Option<String>,
    key: &'static str,
    env: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { key, env })
}

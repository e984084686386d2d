//! Process configuration.
//!
//! Loaded once at startup and read-only afterwards. The only setting the
//! search path depends on is the list of accepted (locally owned) domains.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directory name used under the platform config and data directories.
const APP_DIR: &str = "mailsearch";

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Domains this installation accepts mail for.
    pub domains: Vec<String>,
    /// Location of the message database (platform data dir if unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.json")
    }

    /// Load and validate configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        let config = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded configuration from {:?} ({} accepted domains)",
            path,
            config.accepted_domains().len()
        );
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.accepted_domains().is_empty() {
            return Err(Error::Config("at least one domain is required".into()));
        }
        if self.domains.iter().any(String::is_empty) {
            return Err(Error::Config("domains cannot be empty strings".into()));
        }
        Ok(())
    }

    /// Resolved database path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("mailsearch.db")
        })
    }

    /// Build the accepted-domain set used during validation.
    #[must_use]
    pub fn accepted_domains(&self) -> AcceptedDomains {
        AcceptedDomains::new(self.domains.iter().cloned())
    }
}

/// Set of domains the operator has configured as locally owned.
///
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedDomains(HashSet<String>);

impl AcceptedDomains {
    /// Create a domain set.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(domains.into_iter().map(Into::into).collect())
    }

    /// Whether `domain` is accepted.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains(domain)
    }

    /// Number of configured domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no domains are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

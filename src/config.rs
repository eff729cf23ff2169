//! Service-wide cookie defaults.

use crate::base::cookieerror::{CookieError, CookieResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults applied to every cookie written by a
/// [`CookieService`](crate::service::CookieService).
///
/// Values given on a call always win; these only fill in what the call leaves
/// out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CookieConfig {
    /// Fallback `Path` attribute
    pub path: Option<String>,
    /// Fallback `Domain` attribute
    pub domain: Option<String>,
}

impl CookieConfig {
    /// Create a new config with no defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the fallback domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Parse a config from JSON, e.g. `{"path": "/", "domain": "example.com"}`.
    pub fn from_json_str(json: &str) -> CookieResult<Self> {
        let config: CookieConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> CookieResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CookieError::config_io(path.display().to_string(), e))?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded cookie config");
        Ok(config)
    }

    fn validate(&self) -> CookieResult<()> {
        if let Some(path) = &self.path {
            if !path.starts_with('/') {
                return Err(CookieError::config(format!(
                    "path {:?} must start with '/'",
                    path
                )));
            }
        }
        for value in [&self.path, &self.domain].into_iter().flatten() {
            if value.contains(';') {
                return Err(CookieError::config(format!(
                    "{:?} must not contain ';'",
                    value
                )));
            }
        }
        Ok(())
    }
}

//! Credential and endpoint resolution
//!
//! Settings are looked up by name through a chain of [`ConfigSource`]s. The
//! default chain is an explicit in-process [`Registry`] followed by the
//! process environment ([`EnvSource`]); the first source holding a non-empty
//! value wins.

use crate::error::{ClientError, ClientResult};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

pub const DEFAULT_API_ENDPOINT: &str = "https://ifthenpay.com/api/";
pub const ENV_PREFIX: &str = "IFTHENPAY";

pub const API_ENDPOINT: &str = "api_endpoint";
pub const MB_KEY: &str = "mb_key";
pub const CCARD_KEY: &str = "ccard_key";
pub const MBWAY_KEY: &str = "mbway_key";
pub const CCARD_SUCCESS_URL: &str = "ccard_success_url";
pub const CCARD_ERROR_URL: &str = "ccard_error_url";
pub const CCARD_CANCEL_URL: &str = "ccard_cancel_url";

/// A place settings can be read from.
pub trait ConfigSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Explicit in-process settings. Clones share the same storage, so a value
/// set after a client was built is seen by that client's next call.
#[derive(Clone, Default)]
pub struct Registry {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a flat settings file (`mb_key = "..."`, ...) in any format the
    /// `config` crate recognizes.
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize::<HashMap<String, String>>()?;

        debug!(
            "Loaded {} settings from {}",
            settings.len(),
            path.display()
        );

        let registry = Self::new();
        for (name, value) in settings {
            registry.set(name, value);
        }
        Ok(registry)
    }

    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into().to_lowercase(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name.to_lowercase())
    }
}

impl ConfigSource for Registry {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name.to_lowercase())
            .cloned()
    }
}

// Values are secrets; only the names are printed.
impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = values.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("names", &names).finish()
    }
}

/// Reads `<PREFIX>_<NAME>` from the process environment.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }
}

impl EnvSource {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// `mb_key` becomes `IFTHENPAY_MB_KEY`. Non-alphanumeric characters map
    /// to `_`.
    pub fn variable_name(&self, name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_{}", self.prefix, suffix)
    }
}

impl ConfigSource for EnvSource {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var(self.variable_name(name)).ok()
    }
}

/// Resolves named settings from an ordered list of sources.
#[derive(Clone)]
pub struct CredentialResolver {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl CredentialResolver {
    /// Registry first, then `IFTHENPAY_*` environment variables.
    pub fn new(registry: Registry) -> Self {
        Self::from_sources(vec![
            Arc::new(registry),
            Arc::new(EnvSource::default()),
        ])
    }

    pub fn from_env() -> Self {
        Self::from_sources(vec![Arc::new(EnvSource::default())])
    }

    pub fn from_sources(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        Self { sources }
    }

    /// First non-blank value across the sources, in order.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// Resolve an API key. A missing key is an authentication defect.
    pub fn resolve_key(&self, name: &str) -> ClientResult<String> {
        self.lookup(name)
            .ok_or_else(|| ClientError::authentication(name))
    }

    /// Resolve a redirect callback URL.
    pub fn resolve_callback(&self, name: &str) -> ClientResult<String> {
        self.lookup(name)
            .ok_or_else(|| ClientError::callback_missing(name))
    }

    /// Base endpoint with any trailing `/` removed, so paths can be appended.
    pub fn api_endpoint(&self) -> String {
        self.lookup(API_ENDPOINT)
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("sources", &self.sources.len())
            .finish()
    }
}

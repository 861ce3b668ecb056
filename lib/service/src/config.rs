//! Profile store configuration
//!
//! Connection parameters are loaded once at startup from the environment.
//! Service behavior flags are not configuration; they come from the caller.

use rapport_core::{Error, Result};
use std::env;

pub const ENV_STORE_URL: &str = "RAPPORT_STORE_URL";
pub const ENV_STORE_KEY: &str = "RAPPORT_STORE_KEY";
pub const ENV_STORE_TABLE: &str = "RAPPORT_STORE_TABLE";
pub const ENV_STORE_FILTER: &str = "RAPPORT_STORE_FILTER";

const DEFAULT_TABLE: &str = "users";

/// Connection parameters for the REST profile store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    /// Optional row filter fragment appended to the fetch query,
    /// e.g. `completed_onboarding=eq.true`.
    pub filter: Option<String>,
}

impl StoreConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Load the configuration from the environment.
    ///
    /// `RAPPORT_STORE_URL` and `RAPPORT_STORE_KEY` are required; the table
    /// defaults to `users` and the row filter to none.
    pub fn from_env() -> Result<Self> {
        let url = require(ENV_STORE_URL)?;
        let api_key = require(ENV_STORE_KEY)?;
        let table = env::var(ENV_STORE_TABLE)
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());
        let filter = env::var(ENV_STORE_FILTER).ok().filter(|f| !f.is_empty());

        Ok(Self {
            url,
            api_key,
            table,
            filter,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidConfig(format!("{name} is not set")))
}

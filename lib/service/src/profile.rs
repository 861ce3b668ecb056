//! Profile store boundary
//!
//! One async operation: fetch every user row. Production talks to a
//! PostgREST-style endpoint; tests substitute in-memory sources.

use async_trait::async_trait;
use rapport_core::{Error, Result, UserRecord};
use serde_json::Value;
use tracing::warn;

use crate::config::StoreConfig;

/// Source of raw profile rows.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch every user row currently in the store.
    async fn fetch_all(&self) -> Result<Vec<UserRecord>>;
}

/// REST client for a PostgREST-style profile endpoint.
pub struct RestProfileStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl RestProfileStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        let base = self.config.url.trim_end_matches('/');
        let mut url = format!("{}/rest/v1/{}?select=*", base, self.config.table);
        if let Some(filter) = &self.config.filter {
            url.push('&');
            url.push_str(filter);
        }
        url
    }
}

#[async_trait]
impl ProfileSource for RestProfileStore {
    async fn fetch_all(&self) -> Result<Vec<UserRecord>> {
        let response = self
            .client
            .get(self.endpoint())
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::StoreUnavailable(format!(
                "fetch returned HTTP {}",
                response.status()
            )));
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        Ok(rows_to_records(&rows))
    }
}

/// Convert raw JSON rows into records, skipping rows without a string id.
#[must_use]
pub fn rows_to_records(rows: &[Value]) -> Vec<UserRecord> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match UserRecord::from_row(row) {
            Some(record) => records.push(record),
            None => warn!("skipping profile row without a string id"),
        }
    }
    records
}

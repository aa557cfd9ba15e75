//! Per-site rule persistence.
//!
//! Each site owns three independent keys: `hidden_<site>` (JSON array of
//! locators), `resized_<site>` (JSON object locator → scale), and
//! `status_<site>` (JSON bool). Every mutation is a read-modify-write of the
//! whole field; two overlapping writers to the same field race and the later
//! completion wins. That is accepted, documented behavior, not a defect to
//! fix here.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_json::json;

use crate::storage::KeyValueStore;
use crate::types::errors::StoreError;
use crate::types::rules::{is_default_scale, normalize_scale, SiteRules};

const HIDDEN_PREFIX: &str = "hidden_";
const RESIZED_PREFIX: &str = "resized_";
const STATUS_PREFIX: &str = "status_";

/// Reads and mutates per-site rule sets through a [`KeyValueStore`].
pub struct RuleStore {
    store: Arc<dyn KeyValueStore>,
}

impl RuleStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn hidden_key(site: &str) -> String {
        format!("{}{}", HIDDEN_PREFIX, site)
    }

    fn resized_key(site: &str) -> String {
        format!("{}{}", RESIZED_PREFIX, site)
    }

    fn status_key(site: &str) -> String {
        format!("{}{}", STATUS_PREFIX, site)
    }

    /// Whether rules apply on this site. Defaults to true when unset.
    pub async fn get_active(&self, site: &str) -> Result<bool, StoreError> {
        let value = self.store.get(&Self::status_key(site)).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(true))
    }

    pub async fn set_active(&self, site: &str, active: bool) -> Result<(), StoreError> {
        self.store.set(&Self::status_key(site), json!(active)).await
    }

    /// The site's ordered hidden-locator list. Defaults to empty.
    pub async fn get_hidden(&self, site: &str) -> Result<Vec<String>, StoreError> {
        let value = self.store.get(&Self::hidden_key(site)).await?;
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value)
            .map_err(|e| StoreError::Serialization(format!("Corrupt hidden list: {}", e)))
    }

    /// Appends a locator to the hidden list. Returns false (and writes
    /// nothing) when the locator is already present.
    pub async fn add_hidden(&self, site: &str, locator: &str) -> Result<bool, StoreError> {
        let mut hidden = self.get_hidden(site).await?;
        if hidden.iter().any(|l| l == locator) {
            return Ok(false);
        }
        hidden.push(locator.to_string());
        self.store
            .set(&Self::hidden_key(site), json!(hidden))
            .await?;
        Ok(true)
    }

    /// Removes a locator from the hidden list. Returns whether it was present.
    pub async fn remove_hidden(&self, site: &str, locator: &str) -> Result<bool, StoreError> {
        let mut hidden = self.get_hidden(site).await?;
        let before = hidden.len();
        hidden.retain(|l| l != locator);
        if hidden.len() == before {
            return Ok(false);
        }
        self.store
            .set(&Self::hidden_key(site), json!(hidden))
            .await?;
        Ok(true)
    }

    /// The site's locator → scale mapping. Defaults to empty.
    pub async fn get_resized(&self, site: &str) -> Result<BTreeMap<String, f64>, StoreError> {
        let value = self.store.get(&Self::resized_key(site)).await?;
        let Some(value) = value else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_value(value)
            .map_err(|e| StoreError::Serialization(format!("Corrupt resize map: {}", e)))
    }

    /// Stores a scale for a locator, clamped to [0.2, 5.0] and rounded to the
    /// nearest 0.1. A resulting scale of 1.0 deletes the entry instead, since
    /// 1.0 is the implicit default. Returns the normalized scale.
    pub async fn set_scale(&self, site: &str, locator: &str, scale: f64) -> Result<f64, StoreError> {
        let normalized = normalize_scale(scale);
        let mut resized = self.get_resized(site).await?;
        if is_default_scale(normalized) {
            resized.remove(locator);
        } else {
            resized.insert(locator.to_string(), normalized);
        }
        self.store
            .set(&Self::resized_key(site), json!(resized))
            .await?;
        Ok(normalized)
    }

    /// Removes all three persisted fields for a site.
    pub async fn clear_site(&self, site: &str) -> Result<(), StoreError> {
        let keys = [
            Self::hidden_key(site),
            Self::resized_key(site),
            Self::status_key(site),
        ];
        self.store.remove_many(&keys).await
    }

    /// Wipes every persisted key for every site.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }

    /// Site identifiers that currently carry hide or resize rules, sorted.
    ///
    /// Sites holding only a status flag are not listed; a bare on/off toggle
    /// is not a configuration worth surfacing.
    pub async fn list_sites(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.store.keys().await?;
        let mut sites = BTreeSet::new();
        for key in keys {
            if let Some(site) = key.strip_prefix(HIDDEN_PREFIX) {
                sites.insert(site.to_string());
            } else if let Some(site) = key.strip_prefix(RESIZED_PREFIX) {
                sites.insert(site.to_string());
            }
        }
        Ok(sites.into_iter().collect())
    }

    /// Read-side aggregate of one site's rule set.
    pub async fn snapshot(&self, site: &str) -> Result<SiteRules, StoreError> {
        Ok(SiteRules {
            active: self.get_active(site).await?,
            hidden: self.get_hidden(site).await?,
            resized: self.get_resized(site).await?,
        })
    }

    /// Reads one raw key, bypassing the per-site shaping. Test-support only.
    #[cfg(test)]
    pub(crate) async fn raw_get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.store.get(key).await
    }
}

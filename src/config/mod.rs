//! Connection settings and the product allow-list.
//!
//! Loaded from a JSON file, then overridden from the environment. The
//! product list scopes both the fetch filters and dispatch validation.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use crate::consts::{DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_API_URL, ENV_PRODUCTS};

/// Runtime configuration. Read-only once the dispatcher is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub products: Vec<String>,
    pub timeout_secs: u64,
}

/// On-disk layout. `products` may be a single id or a list.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "apiEndpoint", default)]
    api_url: String,
    #[serde(rename = "apiKey", default)]
    api_key: String,
    #[serde(default)]
    products: Option<Products>,
    #[serde(default)]
    timeout: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Products {
    One(String),
    Many(Vec<String>),
}

impl Products {
    fn into_vec(self) -> Vec<String> {
        match self {
            Products::One(id) => split_products(&id),
            Products::Many(ids) => ids.into_iter().filter(|id| !id.is_empty()).collect(),
        }
    }
}

fn split_products(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, products: Vec<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            products,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Parse a config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json).context("invalid config JSON")?;
        Ok(Self {
            api_url: file.api_url,
            api_key: file.api_key,
            products: file.products.map(Products::into_vec).unwrap_or_default(),
            timeout_secs: file.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read the file at `path`, apply environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_json(&json)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override fields from the given variable lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(products) = get(ENV_PRODUCTS) {
            self.products = split_products(&products);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!("config: apiEndpoint is empty (set it in the file or {ENV_API_URL})");
        }
        if self.api_key.trim().is_empty() {
            bail!("config: apiKey is empty (set it in the file or {ENV_API_KEY})");
        }
        Ok(())
    }

    /// True when no allow-list is set or `product_id` is on it.
    pub fn accepts_product(&self, product_id: &str) -> bool {
        self.products.is_empty() || self.products.iter().any(|p| p == product_id)
    }
}

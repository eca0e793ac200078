//! Project-wide constants.

use std::path::PathBuf;

/// Resource path of tier configuration requests, relative to the API root.
pub const RESOURCE: &str = "tier/config-requests";

/// Returned by dispatch when a request's product is outside the allow-list.
pub const INVALID_PRODUCT: &str = "Invalid product";

/// Status used by the default fetch filters.
pub const DEFAULT_STATUS: &str = "pending";

/// Filter key that scopes results to the product allow-list.
pub const PRODUCT_FILTER: &str = "configuration__product__id";

/// Result code carried by a skip when the processor gives none.
pub const DEFAULT_SKIP_CODE: &str = "skip";

/// HTTP request timeout when the config file sets none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Overrides `apiEndpoint` from the config file.
pub const ENV_API_URL: &str = "TIERCONF_API_URL";
/// Overrides `apiKey` from the config file.
pub const ENV_API_KEY: &str = "TIERCONF_API_KEY";
/// Overrides `products`; comma-separated product ids.
pub const ENV_PRODUCTS: &str = "TIERCONF_PRODUCTS";

/// Default config path: `~/.tierconf/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tierconf")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_ends_with_file_name() {
        let path = default_config_path();
        assert!(path.ends_with(".tierconf/config.json"));
    }

    #[test]
    fn env_names_share_prefix() {
        for name in [ENV_API_URL, ENV_API_KEY, ENV_PRODUCTS] {
            assert!(name.starts_with("TIERCONF_"));
        }
    }
}

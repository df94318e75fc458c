use serde::{Deserialize, Serialize};

fn default_collection() -> String {
    "blogs".to_string()
}

fn default_entry_view() -> String {
    "/login".to_string()
}

fn default_home_view() -> String {
    "/dashboard".to_string()
}

fn default_min_password_length() -> usize {
    8
}

/// Client configuration, read from `config.toml`.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Document-store collection holding posts
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Unauthenticated entry view; guard redirects land here
    #[serde(default = "default_entry_view")]
    pub entry_view: String,
    /// View shown after sign-in
    #[serde(default = "default_home_view")]
    pub home_view: String,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            entry_view: default_entry_view(),
            home_view: default_home_view(),
            min_password_length: default_min_password_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.collection, "blogs");
        assert_eq!(config.min_password_length, 8);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: ClientConfig = toml::from_str("collection = \"posts\"\n").unwrap();
        assert_eq!(config.collection, "posts");
        assert_eq!(config.entry_view, "/login");
    }
}

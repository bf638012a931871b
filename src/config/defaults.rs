//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Server origin plus base path (default: "http://localhost:9999/")
    pub base_url: String,

    /// Force https/wss (default: false)
    pub https: bool,

    /// Run garbage collection after query eviction (default: true)
    pub gc_after_evict: bool,

    /// tracing filter directive (default: "info")
    pub log_filter: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9999/".to_string(),
            https: false,
            gc_after_evict: true,
            log_filter: "info".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging. `server.dev_port` and
    /// `server.api_key` have no default and are left out.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "server": {
                "base_url": self.base_url,
                "https": self.https
            },
            "cache": {
                "gc_after_evict": self.gc_after_evict
            },
            "log": {
                "filter": self.log_filter
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.base_url, "http://localhost:9999/");
        assert!(!defaults.https);
        assert!(defaults.gc_after_evict);
        assert_eq!(defaults.log_filter, "info");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["server"]["base_url"], "http://localhost:9999/");
        assert_eq!(value["cache"]["gc_after_evict"], true);
        assert!(value["server"].get("dev_port").is_none());
    }
}

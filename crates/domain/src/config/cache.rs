use crate::store::StoreNames;
use serde::{Deserialize, Serialize};

/// Cache orchestration settings for one deployment generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Paths pre-populated into the static store at install time, in order.
    #[serde(default = "default_static_manifest")]
    pub static_manifest: Vec<String>,

    /// Entry bound of the dynamic store.
    #[serde(default = "default_dynamic_max_entries")]
    pub dynamic_max_entries: usize,

    #[serde(flatten)]
    pub stores: StoreNames,

    /// Also look in the static store before the dynamic store on
    /// cache-first lookups.
    #[serde(default)]
    pub consult_static_on_cache_first: bool,
}

fn default_static_manifest() -> Vec<String> {
    ["/", "/index.html", "/manifest.json", "/logo.png"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_dynamic_max_entries() -> usize {
    50
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            static_manifest: default_static_manifest(),
            dynamic_max_entries: default_dynamic_max_entries(),
            stores: StoreNames::default(),
            consult_static_on_cache_first: false,
        }
    }
}

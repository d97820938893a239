use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a named store plays in the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreRole {
    Static,
    Dynamic,
    Api,
}

impl StoreRole {
    pub const ALL: [StoreRole; 3] = [Self::Static, Self::Dynamic, Self::Api];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for StoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store names of the current generation. Together they form the
/// allow-list used when purging stores at activation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreNames {
    #[serde(default = "default_static_store", rename = "static_store")]
    pub static_name: String,

    #[serde(default = "default_dynamic_store", rename = "dynamic_store")]
    pub dynamic_name: String,

    #[serde(default = "default_api_store", rename = "api_store")]
    pub api_name: String,
}

impl StoreNames {
    pub fn name(&self, role: StoreRole) -> &str {
        match role {
            StoreRole::Static => &self.static_name,
            StoreRole::Dynamic => &self.dynamic_name,
            StoreRole::Api => &self.api_name,
        }
    }

    pub fn allow_list(&self) -> [&str; 3] {
        [&self.static_name, &self.dynamic_name, &self.api_name]
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.allow_list().contains(&name)
    }
}

impl Default for StoreNames {
    fn default() -> Self {
        Self {
            static_name: default_static_store(),
            dynamic_name: default_dynamic_store(),
            api_name: default_api_store(),
        }
    }
}

fn default_static_store() -> String {
    StoreRole::Static.as_str().to_string()
}

fn default_dynamic_store() -> String {
    StoreRole::Dynamic.as_str().to_string()
}

fn default_api_store() -> String {
    StoreRole::Api.as_str().to_string()
}

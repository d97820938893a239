use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin the application is served from. Requests for any other origin
    /// are never cached.
    #[serde(default = "default_app_origin")]
    pub app_origin: String,

    /// Base URL same-origin fetches are actually sent to. When `None` the
    /// application origin itself is fetched, which must then not resolve
    /// back to this front.
    #[serde(default = "default_upstream")]
    pub upstream: Option<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_app_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_upstream() -> Option<String> {
    Some("http://localhost:3000".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            app_origin: default_app_origin(),
            upstream: default_upstream(),
        }
    }
}

pub mod http;

pub use http::{start_http_server, AppState};

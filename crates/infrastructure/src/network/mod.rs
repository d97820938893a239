pub mod http_fetcher;

pub use http_fetcher::{is_hop_by_hop, ReqwestFetcher};

use std::fmt;

/// Classification of an intercepted same-origin GET request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Manifest entry or the root path, served cache-first.
    StaticAsset,
    /// Anything under `/api/`, served stale-while-revalidate.
    ApiCall,
    /// Everything else, served network-first.
    Other,
}

impl RequestClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaticAsset => "static-asset",
            Self::ApiCall => "api-call",
            Self::Other => "other",
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::StaticAsset => "cache-first",
            Self::ApiCall => "stale-while-revalidate",
            Self::Other => "network-first",
        }
    }
}

impl fmt::Display for RequestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request bypasses every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    CrossOrigin,
    NonGetMethod,
    NotActive,
}

impl PassThroughReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrossOrigin => "cross-origin",
            Self::NonGetMethod => "non-get",
            Self::NotActive => "not-active",
        }
    }
}

/// Routing decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PassThrough(PassThroughReason),
    Intercept(RequestClass),
}

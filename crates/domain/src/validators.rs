use url::Url;

pub fn validate_store_name(name: &str, role: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{role} store name cannot be empty"));
    }
    if name.len() > 200 {
        return Err(format!("{role} store name cannot exceed 200 characters"));
    }
    Ok(())
}

pub fn validate_http_url(raw: &str, field: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("{field} '{raw}' is not a valid URL: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("{field} '{raw}' must use http:// or https://"));
    }
    if url.host_str().is_none() {
        return Err(format!("{field} '{raw}' has no host"));
    }
    Ok(url)
}

pub fn is_loopback_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host
            .parse::<std::net::IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}

pub fn validate_manifest_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("Manifest entry '{path}' must be an absolute path"));
    }
    // `//host/x` would resolve to another origin.
    if path.starts_with("//") {
        return Err(format!("Manifest entry '{path}' must not name a host"));
    }
    // Entries are matched against the request path only.
    if path.contains(['?', '#']) {
        return Err(format!(
            "Manifest entry '{path}' must not carry a query or fragment"
        ));
    }
    if path.len() > 2048 {
        return Err("Manifest entry cannot exceed 2048 characters".to_string());
    }
    Ok(())
}

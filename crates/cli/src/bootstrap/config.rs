use tracing::info;
use waystation_domain::{CliOverrides, Config};

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Called once logging is up, since loading happens before the subscriber exists.
pub fn log_config_summary(config: &Config, config_path: Option<&str>) {
    info!(
        config_file = config_path.unwrap_or("default"),
        port = config.server.port,
        bind = %config.server.bind_address,
        app_origin = %config.server.app_origin,
        storage = config.storage.backend.as_str(),
        dynamic_max_entries = config.cache.dynamic_max_entries,
        "Configuration loaded"
    );
}

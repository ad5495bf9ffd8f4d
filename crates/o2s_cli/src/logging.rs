// o2s_cli/logging - tracing subscriber installation
use crate::config::LogLevel;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Filter directive for the run: the `--log-level` flag, then `RUST_LOG`,
/// then the configuration file, then `warn`.
pub fn resolve_filter(
    cli_level: Option<LogLevel>,
    env_filter: Option<&str>,
    config_level: Option<LogLevel>,
) -> String {
    if let Some(level) = cli_level {
        return level.to_string();
    }
    if let Some(filter) = env_filter.map(str::trim).filter(|filter| !filter.is_empty()) {
        return filter.to_string();
    }
    config_level.unwrap_or_default().to_string()
}

/// Installs the global subscriber on stderr. Fails when a subscriber is
/// already installed.
pub fn init(
    cli_level: Option<LogLevel>,
    config_level: Option<LogLevel>,
) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = resolve_filter(cli_level, env.as_deref(), config_level);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::default().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

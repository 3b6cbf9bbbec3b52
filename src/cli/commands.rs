//! CLI command implementations
//!
//! `serve` boots in a fixed order: load config, apply the log level,
//! register resources, bind, serve. Any failure before serving is fatal.

use std::path::Path;

use serde_json::json;

use crate::config::AppConfig;
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port, host } => serve(config.as_deref(), port, host),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Load the config file (or defaults) and apply command-line overrides
pub fn resolve_config(
    config_path: Option<&Path>,
    port: Option<u16>,
    host: Option<String>,
) -> CliResult<AppConfig> {
    let mut config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    Ok(config)
}

/// Start the HTTP server and block until shutdown
pub fn serve(config_path: Option<&Path>, port: Option<u16>, host: Option<String>) -> CliResult<()> {
    log_event(Event::BootStart);

    let result = boot_and_serve(config_path, port, host);
    if let Err(e) = &result {
        log_event_with_fields(
            Event::BootFailed,
            &[("code", e.code_str()), ("message", e.message())],
        );
    }
    result
}

fn boot_and_serve(
    config_path: Option<&Path>,
    port: Option<u16>,
    host: Option<String>,
) -> CliResult<()> {
    let config = resolve_config(config_path, port, host)?;
    Logger::set_min_severity(config.logging.level);

    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", source.as_str())]);

    let server = HttpServer::with_config(config)
        .map_err(|e| CliError::boot_failed(format!("Failed to register resources: {}", e)))?;
    let names = server.registry().names().join(",");
    log_event_with_fields(Event::ResourcesRegistered, &[("resources", names.as_str())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate a config file and print what it resolves to
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;

    let resources: Vec<_> = config
        .resources
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "id_field": r.store.id_field,
                "default_limit": r.store.default_limit,
                "max_limit": r.store.max_limit,
            })
        })
        .collect();

    write_response(json!({
        "addr": config.server.socket_addr(),
        "resources": resources,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_defaults_with_overrides() {
        let config = resolve_config(None, Some(4000), Some("127.0.0.1".to_string())).unwrap();
        assert_eq!(config.server.socket_addr(), "127.0.0.1:4000");
        assert_eq!(config.resources.len(), 2);
    }

    #[test]
    fn test_resolve_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"server": {{"port": 9000}}, "resources": [{{"name": "notes"}}]}}"#)
            .unwrap();

        let config = resolve_config(Some(file.path()), None, None).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.resources[0].name, "notes");
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"resources": [{{"name": "auth"}}]}}"#).unwrap();

        let err = check_config(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "PULSE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = resolve_config(Some(Path::new("/nonexistent/pulse.json")), None, None)
            .unwrap_err();
        assert_eq!(err.code_str(), "PULSE_CLI_CONFIG_ERROR");
    }
}

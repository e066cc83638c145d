//! CLI argument definitions for the TalkQL terminal client.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use talkql_core::config::DisplayConfig;
use talkql_core::{ResponseModes, SessionParams};

/// TalkQL: chat with a connected database in plain language.
#[derive(Parser, Debug)]
#[command(name = "talkql", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the query service.
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Data-source type handed over from the connection step.
    #[arg(long = "db-type")]
    pub db_type: Option<String>,

    /// Data-source name handed over from the connection step.
    #[arg(long = "db-name")]
    pub db_name: Option<String>,

    /// Session hand-off as a query string, e.g. "dbType=postgres&dbName=shop".
    #[arg(short = 's', long = "session")]
    pub session: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Start with visualization output enabled.
    #[arg(long = "viz")]
    pub viz: bool,

    /// Start with tabular output enabled.
    #[arg(long = "table")]
    pub table: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TALKQL_CONFIG env var > ~/.talkql/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TALKQL_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the query service base URL.
    ///
    /// Priority: --url flag > TALKQL_URL env var > config file value.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("TALKQL_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        config_url.to_string()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Initial toggles: a flag switches a mode on, otherwise the config decides.
    pub fn resolve_modes(&self, display: &DisplayConfig) -> ResponseModes {
        ResponseModes {
            visualization: self.viz || display.visualization,
            tabular: self.table || display.tabular,
        }
    }

    /// Session-start parameters.
    ///
    /// `--db-type` / `--db-name` override the matching keys of `--session`.
    pub fn session_params(&self) -> SessionParams {
        let base = self
            .session
            .as_deref()
            .map(SessionParams::from_query_string)
            .unwrap_or_default();
        SessionParams::new(
            self.db_type.clone().or(base.db_type),
            self.db_name.clone().or(base.db_name),
        )
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".talkql").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".talkql").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use talkql_core::ConnectionInfo;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("talkql").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_config_flag_wins() {
        let args = parse(&["--config", "/tmp/talkql.toml"]);
        assert_eq!(
            args.resolve_config_path(),
            PathBuf::from("/tmp/talkql.toml")
        );
    }

    #[test]
    fn test_url_flag_wins_over_config() {
        let args = parse(&["-u", "http://10.1.1.1:8000"]);
        assert_eq!(
            args.resolve_base_url("http://localhost:8000"),
            "http://10.1.1.1:8000"
        );
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        assert_eq!(parse(&[]).resolve_log_level("warn"), "warn");
        assert_eq!(parse(&["-l", "debug"]).resolve_log_level("warn"), "debug");
    }

    #[test]
    fn test_session_query_string() {
        let args = parse(&["--session", "dbType=postgres&dbName=shop"]);
        assert_eq!(
            args.session_params().explicit_connection(),
            Some(ConnectionInfo::new("postgres", "shop"))
        );
    }

    #[test]
    fn test_db_flags_override_session_keys() {
        let args = parse(&[
            "--session",
            "dbType=postgres&dbName=shop",
            "--db-name",
            "warehouse",
        ]);
        let params = args.session_params();
        assert_eq!(params.db_type.as_deref(), Some("postgres"));
        assert_eq!(params.db_name.as_deref(), Some("warehouse"));
    }

    #[test]
    fn test_no_session_params_by_default() {
        assert_eq!(parse(&[]).session_params(), SessionParams::default());
    }

    #[test]
    fn test_modes_from_flags_and_config() {
        let display = DisplayConfig {
            visualization: false,
            tabular: true,
        };
        let modes = parse(&["--viz"]).resolve_modes(&display);
        assert!(modes.visualization);
        assert!(modes.tabular);

        let modes = parse(&[]).resolve_modes(&DisplayConfig::default());
        assert_eq!(modes, ResponseModes::default());
    }
}

//! CLI argument definitions for the Interlink terminal client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Interlink - an academic assistant chat over files, camera images and voice.
#[derive(Parser, Debug)]
#[command(name = "interlink", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Answer with a local echo model instead of calling the API.
    #[arg(long = "offline")]
    pub offline: bool,

    /// Print replies at once instead of revealing them word by word.
    #[arg(long = "no-reveal")]
    pub no_reveal: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long = "write-config")]
    pub write_config: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > INTERLINK_CONFIG env var > ~/.interlink/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("INTERLINK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".interlink").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".interlink").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "interlink",
            "--config",
            "/tmp/i.toml",
            "-l",
            "debug",
            "--offline",
            "--no-reveal",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/i.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.offline);
        assert!(args.no_reveal);
        assert!(!args.write_config);
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["interlink", "-c", "/etc/interlink.toml"]);
        assert_eq!(
            args.resolve_config_path(),
            PathBuf::from("/etc/interlink.toml")
        );
    }

    #[test]
    fn test_default_config_path_file_name() {
        let path = default_config_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_log_level_resolution() {
        let args = CliArgs::parse_from(["interlink"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");
        let args = CliArgs::parse_from(["interlink", "--log-level", "trace"]);
        assert_eq!(args.resolve_log_level("warn"), "trace");
    }
}

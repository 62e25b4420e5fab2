use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "MBS_LOG";

/// Runs an mbs script, or a bundled demo program when none is given.
#[derive(Parser, Debug, PartialEq)]
#[command(name = "mbs", version)]
pub struct Config {
    /// Script to run; the bundled demo when absent.
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Stop after type checking.
    #[arg(long = "check")]
    pub check_only: bool,

    /// error, warn, info, debug or trace
    #[arg(long, env = LOG_ENV, default_value = "warn", value_parser = parse_level)]
    pub log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not one of error, warn, info, debug, trace", s))
}

impl Default for Config {
    fn default() -> Config {
        Config {
            script: None,
            check_only: false,
            log_level: LevelFilter::Warn,
        }
    }
}

use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use clap::ValueHint;
use thiserror::Error;

use crate::sink::FloatPolicy;

/// Output format for the scraped metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Influx line protocol on stdout, for a telegraf exec input
    Telegraf,
    /// Gauges to a local statsd endpoint over UDP
    Statsd,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API token for Ansible Tower
    ///
    /// Positional alternative to --api-token.
    #[arg(value_hint = ValueHint::Other)]
    pub token: Option<String>,

    /// API token for Ansible Tower
    ///
    /// The bearer credential sent with the metrics request. Takes precedence
    /// over the positional form.
    #[arg(long, env = "TOWER_API_TOKEN", value_hint = ValueHint::Other)]
    pub api_token: Option<String>,

    /// Format to send metrics in
    #[arg(long, env = "TOWER_FORMAT", value_enum, default_value = "telegraf")]
    pub format: Format,

    /// Ansible Tower server to scrape
    ///
    /// Host part of the metrics endpoint: https://<SERVER_URL>/api/v2/metrics/
    #[arg(long, env = "TOWER_SERVER_URL", value_hint = ValueHint::Hostname, default_value = "localhost")]
    pub server_url: String,

    /// statsd endpoint gauges are sent to
    #[arg(long, env = "STATSD_ADDR", value_hint = ValueHint::Hostname, default_value = "localhost:14499")]
    pub statsd_addr: String,

    /// Prefix put in front of every statsd gauge name
    #[arg(long, default_value = "statsd.")]
    pub statsd_prefix: String,

    /// What to do with float-valued metrics in statsd mode
    #[arg(long, value_enum, default_value = "reject")]
    pub float_policy: FloatPolicy,

    /// Also append every emitted line-protocol line to this file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub debug_file: Option<PathBuf>,

    /// Set the logging level
    ///
    /// Set the logging level to use when logging to the log file
    #[arg(short, long, env = "LOG_LEVEL", value_hint = ValueHint::Other, default_value = "INFO")]
    pub loglevel: log::LevelFilter,

    /// Write the log somewhere other than the default file under the system
    /// temp directory
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

/// Flat runtime configuration resolved from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub format: Format,
    pub server_url: String,
    pub statsd_addr: String,
    pub statsd_prefix: String,
    pub float_policy: FloatPolicy,
    pub debug_file: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API token provided, an Ansible Tower API key is required")]
    MissingToken,
}

impl Cli {
    /// Resolve the parsed arguments into the runtime config. Fails before
    /// any network traffic when the token is missing or empty.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let api_token = self
            .api_token
            .or(self.token)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        Ok(Config {
            api_token,
            format: self.format,
            server_url: self.server_url,
            statsd_addr: self.statsd_addr,
            statsd_prefix: self.statsd_prefix,
            float_policy: self.float_policy,
            debug_file: self.debug_file,
        })
    }
}

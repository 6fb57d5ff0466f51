/// Prestart configuration
///
/// # Environment Variables
///
/// - `DATABASE_URL` and the other `DATABASE_*` pool settings
/// - `PRESTART_MAX_TRIES`: readiness attempts before giving up (default: 60)
/// - `PRESTART_WAIT_SECS`: pause between attempts (default: 1)
/// - `PRESTART_CREATE_DATABASE`: create the database when missing, given as
///   `true`/`false`, `1`/`0`, `yes`/`no` or `on`/`off` (default: false)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
///
/// # Example
///
/// ```no_run
/// use birthday_prestart::config::PrestartConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = PrestartConfig::from_env()?;
/// println!("Waiting up to {} attempts", config.max_tries);
/// # Ok(())
/// # }
/// ```

use birthday_shared::db::pool::{parse_flag, parse_var, ConfigError, DatabaseConfig};
use std::str::FromStr;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, for terminals
    #[default]
    Pretty,

    /// One JSON object per line, for log collectors
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

impl LogFormat {
    /// Reads `LOG_FORMAT`
    pub fn from_env() -> Result<Self, ConfigError> {
        parse_var("LOG_FORMAT", LogFormat::default())
    }
}

/// Settings of the prestart task
#[derive(Debug, Clone)]
pub struct PrestartConfig {
    /// Pool used for readiness checks and schema registration
    pub database: DatabaseConfig,

    /// Readiness attempts before giving up
    pub max_tries: u32,

    /// Pause between readiness attempts (seconds)
    pub wait_seconds: u64,

    /// Create the database when it does not exist
    pub create_database: bool,
}

impl Default for PrestartConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            max_tries: 60,
            wait_seconds: 1,
            create_database: false,
        }
    }
}

impl PrestartConfig {
    /// Loads the configuration from the environment (and `.env`)
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a variable does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            max_tries: parse_var("PRESTART_MAX_TRIES", defaults.max_tries)?,
            wait_seconds: parse_var("PRESTART_WAIT_SECS", defaults.wait_seconds)?,
            create_database: parse_flag("PRESTART_CREATE_DATABASE", defaults.create_database)?,
        })
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prestart_defaults() {
        let config = PrestartConfig::default();
        assert_eq!(config.max_tries, 60);
        assert_eq!(config.wait(), Duration::from_secs(1));
        assert!(!config.create_database);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}

use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;
use thiserror::Error;

use crate::data::{NHL_SCOREBOARD_URL, TSN_LOGO_URL_TEMPLATE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("unknown time zone {0:?}")]
    UnknownZone(String),
    #[error("logo url template must contain {{token}}: {0}")]
    MissingToken(String),
}

/// Live NHL scores ticker
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Score refresh interval in seconds
    #[arg(short, long, env = "TICKER_INTERVAL_SECS", default_value_t = 10)]
    pub interval: u64,

    /// Clock refresh interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub clock_interval_ms: u64,

    /// IANA time zone for the clock
    #[arg(long, env = "TICKER_TIMEZONE", default_value = "America/New_York")]
    pub timezone: String,

    /// Scoreboard endpoint
    #[arg(long, default_value = NHL_SCOREBOARD_URL)]
    pub scoreboard_url: String,

    /// Logo endpoint; `{token}` is replaced by the hyphenated team name
    #[arg(long, default_value = TSN_LOGO_URL_TEMPLATE)]
    pub logo_url_template: String,

    /// Timeout for every HTTP request, in seconds
    #[arg(long, default_value_t = 10)]
    pub http_timeout_secs: u64,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, env = "TICKER_LOG_FILE", default_value = "nhl-ticker.log")]
    pub log_file: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval("interval"));
        }
        if self.clock_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("clock_interval_ms"));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroInterval("http_timeout_secs"));
        }
        if !self.logo_url_template.contains("{token}") {
            return Err(ConfigError::MissingToken(self.logo_url_template.clone()));
        }
        self.zone()?;
        Ok(())
    }

    pub fn zone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownZone(self.timezone.clone()))
    }

    pub fn score_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("nhl-ticker").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn defaults_match_fixed_behaviour() {
        let config = parse(&[]);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.score_interval(), Duration::from_secs(10));
        assert_eq!(config.clock_interval(), Duration::from_secs(1));
        assert_eq!(config.zone(), Ok(chrono_tz::America::New_York));
        assert_eq!(config.scoreboard_url, NHL_SCOREBOARD_URL);
    }

    #[test]
    fn rejects_zero_interval() {
        let config = parse(&["--interval", "0"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval("interval")));
    }

    #[test]
    fn rejects_unknown_zone() {
        let config = parse(&["--timezone", "Mars/Olympus_Mons"]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownZone("Mars/Olympus_Mons".into()))
        );
    }

    #[test]
    fn rejects_template_without_token() {
        let config = parse(&["--logo-url-template", "https://example.com/logo.png"]);
        assert!(matches!(config.validate(), Err(ConfigError::MissingToken(_))));
    }
}

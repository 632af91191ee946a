use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::burrow_client::ApiVersion;
use crate::filter::Filters;

/// Errors detected while assembling an [`ExporterConfig`].
///
/// All of these are fatal: the process reports them and exits before any scrape begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{setting} setting '{pattern}' is not a valid regexp: {source}")]
    InvalidRegex {
        setting: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Burrow address '{0}' is not a valid absolute URL: {1}")]
    InvalidBurrowAddr(String, String),

    #[error("Burrow address '{0}' must use 'http' or 'https'")]
    UnsupportedBurrowScheme(String),

    #[error("Burrow API version {0} is not supported (expected 2 or 3)")]
    UnsupportedApiVersion(u8),

    #[error("Scrape interval must be greater than 0 seconds")]
    ZeroInterval,

    #[error("{0} must be greater than 0")]
    ZeroValue(&'static str),
}

/// Which metric families get exported. Each field maps to one `--skip-*` flag, inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricToggles {
    pub partition_status: bool,
    pub group_status: bool,
    pub partition_lag: bool,
    pub partition_current_offset: bool,
    pub partition_max_offset: bool,
    pub total_lag: bool,
    pub topic_partition_offset: bool,
}

impl Default for MetricToggles {
    fn default() -> Self {
        Self {
            partition_status: true,
            group_status: true,
            partition_lag: true,
            partition_current_offset: true,
            partition_max_offset: true,
            total_lag: true,
            topic_partition_offset: true,
        }
    }
}

impl MetricToggles {
    /// `true` if at least one family derived from consumer group details is enabled.
    pub fn any_group_family(&self) -> bool {
        self.group_status || self.total_lag || self.any_partition_family()
    }

    /// `true` if at least one per-partition family of consumer groups is enabled.
    pub fn any_partition_family(&self) -> bool {
        self.partition_status
            || self.partition_lag
            || self.partition_current_offset
            || self.partition_max_offset
    }
}

/// Immutable configuration of the exporter, built once at startup and handed to the core.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Base URL of Burrow.
    pub burrow_addr: Url,

    /// Address the metrics endpoint binds to (`HOST:PORT`, host may be a name).
    pub metrics_addr: String,

    /// Time between the end of a scrape cycle and the start of the next one.
    pub interval: Duration,

    pub api_version: ApiVersion,
    pub toggles: MetricToggles,
    pub filters: Filters,

    /// Timeout applied to each request to Burrow.
    pub request_timeout: Duration,

    /// Cap on concurrent fetches, per fan-out level.
    pub max_concurrency: usize,

    /// Series not refreshed in this many cycles are removed from the registry.
    pub stale_after_cycles: u64,
}

/// Parse and validate the Burrow base address.
pub fn parse_burrow_addr(addr: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(addr)
        .map_err(|e| ConfigError::InvalidBurrowAddr(addr.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedBurrowScheme(addr.to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::{parse_burrow_addr, ConfigError, MetricToggles};

    #[test]
    fn burrow_addr_must_be_http_url() {
        assert!(parse_burrow_addr("http://localhost:8000").is_ok());
        assert!(parse_burrow_addr("https://burrow.example.com/prefix/").is_ok());

        assert!(matches!(
            parse_burrow_addr("localhost:8000"),
            Err(ConfigError::UnsupportedBurrowScheme(_))
        ));
        assert!(matches!(
            parse_burrow_addr("not a url"),
            Err(ConfigError::InvalidBurrowAddr(_, _))
        ));
    }

    #[test]
    fn group_families_follow_toggles() {
        let all = MetricToggles::default();
        assert!(all.any_group_family());
        assert!(all.any_partition_family());

        let only_total_lag = MetricToggles {
            partition_status: false,
            group_status: false,
            partition_lag: false,
            partition_current_offset: false,
            partition_max_offset: false,
            total_lag: true,
            topic_partition_offset: false,
        };
        assert!(only_total_lag.any_group_family());
        assert!(!only_total_lag.any_partition_family());

        let none = MetricToggles {
            total_lag: false,
            ..only_total_lag
        };
        assert!(!none.any_group_family());
    }
}

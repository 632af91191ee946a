use std::time::Duration;

use clap::{error::ErrorKind, ArgGroup, CommandFactory, Parser};

use crate::burrow_client::ApiVersion;
use crate::config::{parse_burrow_addr, ConfigError, ExporterConfig, MetricToggles};
use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_FILTER_REGEX, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STALE_AFTER_CYCLES,
};
use crate::filter::Filters;

/// Command Line Interface, defined via the declarative,
/// `derive` based functionality of the `clap` crate.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("logging_flags")
        .required(false)
        .multiple(false)
        .args(["verbose", "quiet"]),
))]
pub struct Cli {
    // ---------------------------------------------------------------------------------- Burrow
    /// Base URL of Burrow (format: 'http(s)://HOST:PORT[/PREFIX]').
    #[arg(long = "burrow-addr", env = "BURROW_ADDR", value_name = "URL")]
    pub burrow_addr: String,

    /// Version of the Burrow HTTP API (2 or 3).
    ///
    /// Version 2 reports the partitions max offset within consumer group details;
    /// version 3 doesn't, so it's looked up in the topic details instead.
    #[arg(
        long = "api-version",
        env = "API_VERSION",
        value_name = "VERSION",
        default_value = DEFAULT_API_VERSION,
        verbatim_doc_comment
    )]
    pub api_version: u8,

    /// Timeout (seconds) of each request to Burrow.
    #[arg(
        long = "request-timeout",
        env = "REQUEST_TIMEOUT",
        value_name = "SECONDS",
        default_value = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    pub request_timeout: u64,

    /// Maximum requests to Burrow in flight, at each level of a scrape.
    ///
    /// The cap applies to clusters fetched concurrently and, within a cluster,
    /// to consumer group and topic details fetched concurrently.
    #[arg(
        long = "max-concurrency",
        env = "MAX_CONCURRENCY",
        value_name = "REQUESTS",
        default_value = DEFAULT_MAX_CONCURRENCY,
        verbatim_doc_comment
    )]
    pub max_concurrency: usize,

    // --------------------------------------------------------------------------------- Scraping
    /// Seconds between the end of a scrape and the beginning of the next one.
    #[arg(long, env = "INTERVAL", value_name = "SECONDS")]
    pub interval: u64,

    /// Scrapes a series can go without being refreshed, before it's removed.
    ///
    /// Consumer groups, topics or partitions that disappear from Burrow stop
    /// being exported after this many scrapes.
    #[arg(
        long = "stale-after-cycles",
        env = "STALE_AFTER_CYCLES",
        value_name = "SCRAPES",
        default_value = DEFAULT_STALE_AFTER_CYCLES,
        verbatim_doc_comment
    )]
    pub stale_after_cycles: u64,

    /// Regular expression selecting the clusters to export.
    #[arg(long, env = "CLUSTERS", value_name = "REGEX", default_value = DEFAULT_FILTER_REGEX)]
    pub clusters: String,

    /// Regular expression selecting the consumer groups to export.
    #[arg(
        long = "consumer-groups",
        env = "CONSUMER_GROUPS",
        value_name = "REGEX",
        default_value = DEFAULT_FILTER_REGEX
    )]
    pub consumer_groups: String,

    /// Regular expression selecting the topics to export.
    ///
    /// Applies both to topic offsets, and to the partitions of consumer groups.
    #[arg(
        long,
        env = "TOPICS",
        value_name = "REGEX",
        default_value = DEFAULT_FILTER_REGEX,
        verbatim_doc_comment
    )]
    pub topics: String,

    // ------------------------------------------------------------------------------ Skip flags
    /// Don't export 'partition_status'.
    #[arg(long, env = "SKIP_PARTITION_STATUS")]
    pub skip_partition_status: bool,

    /// Don't export 'status' of consumer groups.
    #[arg(long, env = "SKIP_GROUP_STATUS")]
    pub skip_group_status: bool,

    /// Don't export 'partition_lag'.
    #[arg(long, env = "SKIP_PARTITION_LAG")]
    pub skip_partition_lag: bool,

    /// Don't export 'partition_current_offset'.
    #[arg(long, env = "SKIP_PARTITION_CURRENT_OFFSET")]
    pub skip_partition_current_offset: bool,

    /// Don't export 'partition_max_offset'.
    #[arg(long, env = "SKIP_PARTITION_MAX_OFFSET")]
    pub skip_partition_max_offset: bool,

    /// Don't export 'total_lag' of consumer groups.
    #[arg(long, env = "SKIP_TOTAL_LAG")]
    pub skip_total_lag: bool,

    /// Don't export 'topic_partition_offset'.
    #[arg(long, env = "SKIP_TOPIC_PARTITION_OFFSET")]
    pub skip_topic_partition_offset: bool,

    // ------------------------------------------------------------------------------------ HTTP
    /// Address to listen on for HTTP requests (format: 'HOST:PORT').
    ///
    /// Metrics are served at '/metrics'.
    #[arg(long = "metrics-addr", env = "METRICS_ADDR", value_name = "HOST:PORT", verbatim_doc_comment)]
    pub metrics_addr: String,

    /// Verbose logging.
    ///
    /// * none    = 'WARN'
    /// * '-v'    = 'INFO'
    /// * '-vv'   = 'DEBUG'
    /// * '-vvv'  = 'TRACE'
    ///
    /// Alternatively, set environment variable 'BURROW_EXPORTER_LOG=(ERROR|WARN|INFO|DEBUG|TRACE|OFF)'.
    #[arg(short, long, action = clap::ArgAction::Count, verbatim_doc_comment)]
    pub verbose: u8,

    /// Quiet logging.
    ///
    /// * none    = 'WARN'
    /// * '-q'    = 'ERROR'
    /// * '-qq'   = 'OFF'
    ///
    /// Alternatively, set environment variable 'BURROW_EXPORTER_LOG=(ERROR|WARN|INFO|DEBUG|TRACE|OFF)'.
    #[arg(short, long, action = clap::ArgAction::Count, verbatim_doc_comment)]
    pub quiet: u8,
}

impl Cli {
    /// Parse the command line, and validate it into an [`ExporterConfig`].
    ///
    /// Any invalid input is reported the way `clap` reports its own errors,
    /// and the process exits.
    pub fn parse_and_validate() -> (Self, ExporterConfig) {
        let cli = Self::parse();

        match cli.build_exporter_config() {
            Ok(config) => (cli, config),
            Err(e) => Self::command().error(ErrorKind::ValueValidation, e).exit(),
        }
    }

    pub fn verbosity_level(&self) -> i8 {
        self.verbose as i8 - self.quiet as i8
    }

    pub fn metric_toggles(&self) -> MetricToggles {
        MetricToggles {
            partition_status: !self.skip_partition_status,
            group_status: !self.skip_group_status,
            partition_lag: !self.skip_partition_lag,
            partition_current_offset: !self.skip_partition_current_offset,
            partition_max_offset: !self.skip_partition_max_offset,
            total_lag: !self.skip_total_lag,
            topic_partition_offset: !self.skip_topic_partition_offset,
        }
    }

    pub fn build_exporter_config(&self) -> Result<ExporterConfig, ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::ZeroValue("request-timeout"));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroValue("max-concurrency"));
        }
        if self.stale_after_cycles == 0 {
            return Err(ConfigError::ZeroValue("stale-after-cycles"));
        }

        let config = ExporterConfig {
            burrow_addr: parse_burrow_addr(&self.burrow_addr)?,
            metrics_addr: self.metrics_addr.clone(),
            interval: Duration::from_secs(self.interval),
            api_version: ApiVersion::try_from(self.api_version)?,
            toggles: self.metric_toggles(),
            filters: Filters::new(&self.clusters, &self.consumer_groups, &self.topics)?,
            request_timeout: Duration::from_secs(self.request_timeout),
            max_concurrency: self.max_concurrency,
            stale_after_cycles: self.stale_after_cycles,
        };

        trace!("Created:\n{:#?}", config);
        Ok(config)
    }
}

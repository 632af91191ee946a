/// Default Burrow HTTP API version, used to pick the response decoder.
pub(crate) const DEFAULT_API_VERSION: &str = "3";

/// Default timeout (seconds) for a single request to Burrow.
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "10";

/// Default cap on concurrent fetches towards Burrow.
pub(crate) const DEFAULT_MAX_CONCURRENCY: &str = "8";

/// Default number of scrape cycles a series can go without being refreshed, before it's pruned.
pub(crate) const DEFAULT_STALE_AFTER_CYCLES: &str = "3";

/// Default filter for clusters, consumer groups and topics: match everything.
pub(crate) const DEFAULT_FILTER_REGEX: &str = ".*";

/// Path where the Prometheus exposition is served.
pub(crate) const METRICS_PATH: &str = "/metrics";

/// Environment variable that overrides the logging level set via `-v`/`-q`.
pub(crate) const LOG_ENV_VAR: &str = "BURROW_EXPORTER_LOG";

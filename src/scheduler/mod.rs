// Inner modules
mod publish;
mod scrape;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::{
    task::JoinHandle,
    time::{sleep, Instant},
};
use tokio_util::sync::CancellationToken;

use crate::burrow_client::LagServiceClient;
use crate::config::ExporterConfig;
use crate::prometheus_metrics::{
    MetricPublisher, LABEL_OUTCOME, LAST_SCRAPE_DURATION, LAST_SCRAPE_TIMESTAMP, SCRAPES_TOTAL,
};
use publish::publish_snapshot;
use scrape::Scraper;

/// Lifecycle of a [`ScrapeScheduler`]: `Idle -> Running -> Stopping -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, never started.
    Idle,
    /// Scraping periodically.
    Running,
    /// Cancellation observed, waiting to be closed.
    Stopping,
    /// Closed: the scrape loop is gone and won't publish anymore.
    Stopped,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Scheduler can only be started when Idle, but it's {0:?}")]
    NotIdle(SchedulerState),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scrape Burrow, publish, repeat.
struct ScrapeLoop {
    scraper: Scraper,
    publisher: Arc<dyn MetricPublisher>,
    interval: Duration,
}

impl ScrapeLoop {
    fn new(
        config: &ExporterConfig,
        client: Arc<dyn LagServiceClient>,
        publisher: Arc<dyn MetricPublisher>,
    ) -> Self {
        Self {
            scraper: Scraper::new(config, client),
            publisher,
            interval: config.interval,
        }
    }

    /// Run scrape cycles, until `shutdown_token` is cancelled.
    ///
    /// The first cycle begins immediately. Each following one begins `interval` after the
    /// previous one completed: cycles never overlap.
    async fn run(self, shutdown_token: CancellationToken, state: Arc<Mutex<SchedulerState>>) {
        info!("Begin scraping Burrow every {:?}", self.interval);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_token.cancelled() => {
                    info!("Shutting down: interrupting scrape cycle");
                    break;
                },
                _ = self.run_cycle() => {},
            }

            tokio::select! {
                biased;
                _ = shutdown_token.cancelled() => {
                    info!("Shutting down");
                    break;
                },
                _ = sleep(self.interval) => {},
            }
        }

        *state.lock() = SchedulerState::Stopping;
    }

    /// Scrape and publish.
    ///
    /// Publishing happens only once all the fetching is done, without suspending:
    /// dropping this future (i.e. cancelling it) can't leave a cycle half-published.
    async fn run_cycle(&self) {
        let start = Instant::now();

        let snapshot = match self.scraper.scrape().await {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to list clusters, skipping scrape cycle: {e}");
                self.count_scrape("failure");
                return;
            },
        };

        let cycle = self.publisher.begin_cycle();
        publish_snapshot(&snapshot, self.scraper.toggles(), self.publisher.as_ref());

        let elapsed = start.elapsed();
        self.set_self_gauge(LAST_SCRAPE_DURATION.name, elapsed.as_secs_f64());
        self.set_self_gauge(
            LAST_SCRAPE_TIMESTAMP.name,
            Utc::now().timestamp_millis() as f64 / 1000.0,
        );
        self.count_scrape("success");

        let pruned = self.publisher.end_cycle();

        info!(
            "Scrape cycle {cycle} completed in {elapsed:?}: {} clusters, {} groups, {} topics, {} failed fetches, {pruned} stale series pruned",
            snapshot.clusters.len(),
            snapshot.groups_count(),
            snapshot.topics_count(),
            snapshot.failures_count(),
        );
    }

    fn count_scrape(&self, outcome: &str) {
        if let Err(e) = self.publisher.inc_counter(SCRAPES_TOTAL.name, &[(LABEL_OUTCOME, outcome)], 1.0) {
            error!("Failed to publish '{}': {e}", SCRAPES_TOTAL.name);
        }
    }

    fn set_self_gauge(&self, name: &str, value: f64) {
        if let Err(e) = self.publisher.set_gauge(name, &[], value) {
            error!("Failed to publish '{name}': {e}");
        }
    }
}

/// Drives periodic scraping of Burrow into a [`MetricPublisher`].
///
/// It's started once with [`Self::start`], and stops when the given [`CancellationToken`]
/// is cancelled or [`Self::close`] is called. After `close` returns, nothing more gets published.
pub struct ScrapeScheduler {
    scrape_loop: Option<ScrapeLoop>,
    state: Arc<Mutex<SchedulerState>>,
    cancel_token: Option<CancellationToken>,
    join_handle: Option<JoinHandle<()>>,
}

impl ScrapeScheduler {
    /// Create a new [`ScrapeScheduler`].
    ///
    /// # Arguments
    ///
    /// * `config` - Exporter configuration: interval, filters, toggles and concurrency are used
    /// * `client` - Client to query Burrow with
    /// * `publisher` - Destination of the scraped values
    pub fn new(
        config: &ExporterConfig,
        client: Arc<dyn LagServiceClient>,
        publisher: Arc<dyn MetricPublisher>,
    ) -> Self {
        Self {
            scrape_loop: Some(ScrapeLoop::new(config, client, publisher)),
            state: Arc::new(Mutex::new(SchedulerState::Idle)),
            cancel_token: None,
            join_handle: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Spawn the scrape loop: the first cycle begins right away.
    ///
    /// # Arguments
    ///
    /// * `shutdown_token`: A [`CancellationToken`] that, when cancelled, will make the scrape loop terminate.
    pub fn start(&mut self, shutdown_token: CancellationToken) -> SchedulerResult<()> {
        let mut state = self.state.lock();
        let scrape_loop = match (*state, self.scrape_loop.take()) {
            (SchedulerState::Idle, Some(sl)) => sl,
            (current, _) => return Err(SchedulerError::NotIdle(current)),
        };
        *state = SchedulerState::Running;
        drop(state);

        // A child token, so `close` can stop the loop without cancelling the caller's token
        let token = shutdown_token.child_token();
        self.cancel_token = Some(token.clone());
        self.join_handle = Some(tokio::spawn(scrape_loop.run(token, self.state.clone())));

        debug!("Started");
        Ok(())
    }

    /// Stop the scrape loop (if running), and wait for it to terminate.
    ///
    /// Calling it more than once is harmless.
    pub async fn close(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.join_handle.take() {
            if let Err(e) = handle.await {
                error!("Scrape loop terminated abnormally: {e}");
            }
        }

        // Dropping the loop (if never started) releases the client
        self.scrape_loop = None;

        let mut state = self.state.lock();
        if *state != SchedulerState::Stopped {
            *state = SchedulerState::Stopped;
            debug!("Stopped");
        }
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use prometheus::{CounterVec, GaugeVec, Opts, Registry};
use thiserror::Error;

use super::{COUNTERS, GAUGES};

/// Possible errors when publishing a metric.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Metric '{0}' is not registered")]
    UnknownMetric(String),

    #[error("Counter '{0}' can't be incremented by negative delta {1}")]
    NegativeDelta(String, f64),

    #[error("Prometheus failure: {0}")]
    Prometheus(#[from] prometheus::Error),
}

pub type PublishResult<T> = Result<T, PublishError>;

/// A set of `(label name, label value)` identifying a series within a metric family.
pub type LabelSet<'a> = [(&'a str, &'a str)];

/// Destination of the values produced by each scrape cycle.
///
/// Writes to distinct label sets can happen concurrently, and are safe to interleave
/// with reads of the published values.
pub trait MetricPublisher: Send + Sync {
    /// Set the series of gauge `name` identified by `labels` to `value`, replacing any previous value.
    fn set_gauge(&self, name: &str, labels: &LabelSet, value: f64) -> PublishResult<()>;

    /// Increment the series of counter `name` identified by `labels` by `delta` (non-negative).
    fn inc_counter(&self, name: &str, labels: &LabelSet, delta: f64) -> PublishResult<()>;

    /// Mark the start of publishing a new scrape cycle; returns the cycle number.
    fn begin_cycle(&self) -> u64;

    /// Mark the end of publishing a scrape cycle; returns how many stale series were removed.
    fn end_cycle(&self) -> usize;
}

/// Identifies a gauge series: family name, and label pairs sorted by label name.
type SeriesKey = (&'static str, Vec<(String, String)>);

/// [`MetricPublisher`] backed by a Prometheus [`Registry`].
///
/// Gauge series are pruned once they have not been set for `stale_after_cycles` cycles,
/// so entities that disappear from Burrow also disappear from the exposition.
/// Counters are never pruned.
pub struct PrometheusPublisher {
    gauges: HashMap<&'static str, GaugeVec>,
    counters: HashMap<&'static str, CounterVec>,

    cycle: AtomicU64,
    last_seen: Mutex<HashMap<SeriesKey, u64>>,
    stale_after_cycles: u64,
}

impl PrometheusPublisher {
    /// Create a new [`PrometheusPublisher`], registering all known metric families in `registry`.
    ///
    /// # Arguments
    ///
    /// * `registry` - Registry that the metrics endpoint gathers from
    /// * `stale_after_cycles` - Cycles a gauge series can go without being set, before removal (min 1)
    pub fn new(registry: &Registry, stale_after_cycles: u64) -> PublishResult<Self> {
        let mut gauges = HashMap::with_capacity(GAUGES.len());
        for def in GAUGES {
            let gv = GaugeVec::new(Opts::new(def.name, def.help), def.labels)?;
            registry.register(Box::new(gv.clone()))?;
            gauges.insert(def.name, gv);
        }

        let mut counters = HashMap::with_capacity(COUNTERS.len());
        for def in COUNTERS {
            let cv = CounterVec::new(Opts::new(def.name, def.help), def.labels)?;
            registry.register(Box::new(cv.clone()))?;
            counters.insert(def.name, cv);
        }

        Ok(Self {
            gauges,
            counters,
            cycle: AtomicU64::new(0),
            last_seen: Mutex::new(HashMap::new()),
            stale_after_cycles: stale_after_cycles.max(1),
        })
    }

    /// Number of gauge series currently published.
    #[cfg(test)]
    pub fn gauge_series_count(&self) -> usize {
        self.last_seen.lock().len()
    }
}

fn as_label_map<'a>(labels: &'a LabelSet) -> HashMap<&'a str, &'a str> {
    labels.iter().copied().collect()
}

impl MetricPublisher for PrometheusPublisher {
    fn set_gauge(&self, name: &str, labels: &LabelSet, value: f64) -> PublishResult<()> {
        let (&family, gv) =
            self.gauges.get_key_value(name).ok_or_else(|| PublishError::UnknownMetric(name.to_string()))?;

        gv.get_metric_with(&as_label_map(labels))?.set(value);

        let mut key_labels: Vec<(String, String)> =
            labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        key_labels.sort();
        self.last_seen.lock().insert((family, key_labels), self.cycle.load(Ordering::Acquire));

        Ok(())
    }

    fn inc_counter(&self, name: &str, labels: &LabelSet, delta: f64) -> PublishResult<()> {
        let cv =
            self.counters.get(name).ok_or_else(|| PublishError::UnknownMetric(name.to_string()))?;

        if delta < 0.0 {
            return Err(PublishError::NegativeDelta(name.to_string(), delta));
        }

        cv.get_metric_with(&as_label_map(labels))?.inc_by(delta);
        Ok(())
    }

    fn begin_cycle(&self) -> u64 {
        self.cycle.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn end_cycle(&self) -> usize {
        let current = self.cycle.load(Ordering::Acquire);
        let mut pruned = 0;

        self.last_seen.lock().retain(|(family, labels), seen| {
            if current.saturating_sub(*seen) < self.stale_after_cycles {
                return true;
            }

            if let Some(gv) = self.gauges.get(family) {
                let label_map: HashMap<&str, &str> =
                    labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                if let Err(e) = gv.remove(&label_map) {
                    warn!("Failed to remove stale series of '{family}' {labels:?}: {e}");
                }
            }

            trace!("Pruned stale series of '{family}' {labels:?}");
            pruned += 1;
            false
        });

        if pruned > 0 {
            debug!("Pruned {pruned} stale series");
        }
        pruned
    }
}

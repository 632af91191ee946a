// Inner modules
mod families;
mod publisher;

use prometheus::{Registry, TextEncoder};

// Exports
pub use families::*;
pub use publisher::{MetricPublisher, PrometheusPublisher};

pub const NAMESPACE: &str = "kafka_burrow";

pub const LABEL_CLUSTER: &str = "cluster";
pub const LABEL_GROUP: &str = "group";
pub const LABEL_TOPIC: &str = "topic";
pub const LABEL_PARTITION: &str = "partition";
pub const LABEL_KIND: &str = "kind";
pub const LABEL_OUTCOME: &str = "outcome";

/// Render all the metrics in `registry`, in Prometheus text exposition format.
pub fn render(registry: &Registry) -> Result<String, prometheus::Error> {
    let mut body = String::new();
    TextEncoder.encode_utf8(&registry.gather(), &mut body)?;
    Ok(body)
}

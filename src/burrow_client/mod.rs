// Inner modules
mod api_version;
mod client;
mod errors;
#[cfg(test)]
pub(crate) mod fake;
mod wire;

use async_trait::async_trait;

use crate::burrow_types::{ConsumerGroup, Topic};

// Exports
pub use api_version::ApiVersion;
pub use client::BurrowClient;
pub use errors::{ClientError, ClientResult};

/// Read-only queries against the Burrow hierarchy of clusters, consumer groups and topics.
///
/// Each call is a single request/response: retrying is left to the caller.
/// Dropping a returned future aborts the request in flight.
#[async_trait]
pub trait LagServiceClient: Send + Sync {
    /// Names of the Kafka clusters known to Burrow.
    async fn list_clusters(&self) -> ClientResult<Vec<String>>;

    /// Names of the consumer groups Burrow tracks in `cluster`.
    async fn list_consumer_groups(&self, cluster: &str) -> ClientResult<Vec<String>>;

    /// Status, lag and offsets of consumer `group` in `cluster`.
    async fn get_consumer_group(&self, cluster: &str, group: &str) -> ClientResult<ConsumerGroup>;

    /// Names of the topics Burrow tracks in `cluster`.
    async fn list_topics(&self, cluster: &str) -> ClientResult<Vec<String>>;

    /// Latest offset of each partition of `topic` in `cluster`.
    async fn get_topic(&self, cluster: &str, topic: &str) -> ClientResult<Topic>;
}

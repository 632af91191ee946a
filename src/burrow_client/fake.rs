use std::collections::{HashMap, HashSet};
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};

use super::{ClientError, ClientResult, LagServiceClient};
use crate::burrow_types::{ConsumerGroup, Topic};

/// In-memory [`LagServiceClient`], for tests.
#[derive(Default)]
pub(crate) struct FakeLagService {
    pub clusters: Vec<String>,
    pub groups: HashMap<String, Vec<ConsumerGroup>>,
    pub topics: HashMap<String, Vec<Topic>>,

    /// Clusters for which every request fails as [`ClientError::Unreachable`].
    pub unreachable_clusters: HashSet<String>,

    /// Groups listed, but missing when their detail is requested.
    pub vanished_groups: HashSet<String>,

    /// Fail the cluster listing itself.
    pub unreachable: bool,

    /// Delay applied to every `list_clusters` call.
    pub list_clusters_delay: Duration,

    /// Delay applied to every `get_consumer_group` call.
    pub group_detail_delay: Duration,

    /// Instants at which `list_clusters` was called, and returned.
    pub list_clusters_calls: Mutex<Vec<(Instant, Instant)>>,

    /// Every `(cluster, entity)` detail requested.
    pub detail_requests: Mutex<Vec<(String, String)>>,
}

fn unreachable(what: &str) -> ClientError {
    ClientError::Unreachable {
        url: what.to_string(),
        source: Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused")),
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::NotFound {
        url: what.to_string(),
    }
}

impl FakeLagService {
    fn check_cluster(&self, cluster: &str) -> ClientResult<()> {
        if self.unreachable_clusters.contains(cluster) {
            return Err(unreachable(cluster));
        }
        Ok(())
    }

    pub fn list_clusters_count(&self) -> usize {
        self.list_clusters_calls.lock().len()
    }
}

#[async_trait]
impl LagServiceClient for FakeLagService {
    async fn list_clusters(&self) -> ClientResult<Vec<String>> {
        let called_at = Instant::now();
        sleep(self.list_clusters_delay).await;
        self.list_clusters_calls.lock().push((called_at, Instant::now()));

        if self.unreachable {
            return Err(unreachable("clusters"));
        }
        Ok(self.clusters.clone())
    }

    async fn list_consumer_groups(&self, cluster: &str) -> ClientResult<Vec<String>> {
        self.check_cluster(cluster)?;
        Ok(self
            .groups
            .get(cluster)
            .map(|gs| gs.iter().map(|g| g.name.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_consumer_group(&self, cluster: &str, group: &str) -> ClientResult<ConsumerGroup> {
        self.detail_requests.lock().push((cluster.to_string(), group.to_string()));
        sleep(self.group_detail_delay).await;
        self.check_cluster(cluster)?;

        if self.vanished_groups.contains(group) {
            return Err(not_found(group));
        }
        self.groups
            .get(cluster)
            .and_then(|gs| gs.iter().find(|g| g.name == group))
            .cloned()
            .ok_or_else(|| not_found(group))
    }

    async fn list_topics(&self, cluster: &str) -> ClientResult<Vec<String>> {
        self.check_cluster(cluster)?;
        Ok(self
            .topics
            .get(cluster)
            .map(|ts| ts.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_topic(&self, cluster: &str, topic: &str) -> ClientResult<Topic> {
        self.detail_requests.lock().push((cluster.to_string(), topic.to_string()));
        self.check_cluster(cluster)?;

        self.topics
            .get(cluster)
            .and_then(|ts| ts.iter().find(|t| t.name == topic))
            .cloned()
            .ok_or_else(|| not_found(topic))
    }
}

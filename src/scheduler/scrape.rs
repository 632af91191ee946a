use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::burrow_client::{ApiVersion, ClientError, ClientResult, LagServiceClient};
use crate::burrow_types::{ConsumerGroup, Topic};
use crate::config::{ExporterConfig, MetricToggles};
use crate::filter::Filters;

/// A request to Burrow that failed during a scrape cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// What was being fetched (e.g. `consumer group 'billing'`).
    pub entity: String,

    /// Classification of the error, see [`ClientError::kind`].
    pub kind: &'static str,
}

/// Everything fetched, and filtered, for one cluster during a scrape cycle.
#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    pub name: String,
    pub groups: Vec<ConsumerGroup>,
    pub topics: Vec<Topic>,
    pub failures: Vec<FetchFailure>,
}

/// Everything fetched during one scrape cycle. Built fresh each cycle, dropped once published.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub clusters: Vec<ClusterSnapshot>,
}

impl Snapshot {
    pub fn groups_count(&self) -> usize {
        self.clusters.iter().map(|c| c.groups.len()).sum()
    }

    pub fn topics_count(&self) -> usize {
        self.clusters.iter().map(|c| c.topics.len()).sum()
    }

    pub fn failures_count(&self) -> usize {
        self.clusters.iter().map(|c| c.failures.len()).sum()
    }
}

/// Walks the Burrow hierarchy, applying [`Filters`], to build a [`Snapshot`].
///
/// Clusters are scraped concurrently; within a cluster, topic and group details are too.
/// Each fan-out is capped at `max_concurrency` requests in flight.
pub struct Scraper {
    client: Arc<dyn LagServiceClient>,
    filters: Filters,
    toggles: MetricToggles,
    api_version: ApiVersion,
    max_concurrency: usize,
}

impl Scraper {
    pub fn new(config: &ExporterConfig, client: Arc<dyn LagServiceClient>) -> Self {
        Self {
            client,
            filters: config.filters.clone(),
            toggles: config.toggles,
            api_version: config.api_version,
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    pub fn toggles(&self) -> &MetricToggles {
        &self.toggles
    }

    /// Run one scrape of all the clusters that pass the filter.
    ///
    /// Only a failure to list the clusters fails the scrape as a whole: any other failure
    /// is recorded in the [`ClusterSnapshot`] it concerns, and the affected entity skipped.
    pub async fn scrape(&self) -> ClientResult<Snapshot> {
        let clusters: Vec<String> = self
            .client
            .list_clusters()
            .await?
            .into_iter()
            .filter(|c| {
                let included = self.filters.matches_cluster(c);
                if !included {
                    trace!("Cluster '{c}' excluded by filter");
                }
                included
            })
            .collect();

        let clusters: Vec<ClusterSnapshot> = stream::iter(clusters)
            .map(|c| self.scrape_cluster(c))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        Ok(Snapshot {
            clusters,
        })
    }

    /// Topic details are needed to export their offsets, or to know the partitions max offset
    /// when the API version doesn't report it within the consumer group details.
    ///
    /// Lag is computed from the max offset too, so it must not depend on other families
    /// being exported.
    fn needs_topics(&self) -> bool {
        let needs_max_offset = self.toggles.partition_max_offset
            || self.toggles.partition_lag
            || self.toggles.total_lag;

        self.toggles.topic_partition_offset
            || (needs_max_offset && !self.api_version.reports_max_offset())
    }

    async fn scrape_cluster(&self, cluster: String) -> ClusterSnapshot {
        debug!("Scraping cluster '{cluster}'");

        let ((topics, mut failures), (mut groups, group_failures)) =
            tokio::join!(self.fetch_topics(&cluster), self.fetch_groups(&cluster));
        failures.extend(group_failures);

        if !self.api_version.reports_max_offset() {
            fill_max_offsets(&mut groups, &topics);
        }

        ClusterSnapshot {
            name: cluster,
            groups,
            topics,
            failures,
        }
    }

    async fn fetch_topics(&self, cluster: &str) -> (Vec<Topic>, Vec<FetchFailure>) {
        let mut failures = Vec::new();
        if !self.needs_topics() {
            return (Vec::new(), failures);
        }

        let names = match self.client.list_topics(cluster).await {
            Ok(names) => names,
            Err(e) => {
                failures.push(failure(cluster, "topics".to_string(), e));
                return (Vec::new(), failures);
            },
        };

        let results: Vec<(String, ClientResult<Topic>)> = stream::iter(names)
            .filter(|t| std::future::ready(self.filters.matches_topic(t)))
            .map(|t| async move {
                let res = self.client.get_topic(cluster, &t).await;
                (t, res)
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut topics = Vec::with_capacity(results.len());
        for (name, res) in results {
            match res {
                Ok(t) => topics.push(t),
                Err(e) => failures.push(failure(cluster, format!("topic '{name}'"), e)),
            }
        }

        (topics, failures)
    }

    async fn fetch_groups(&self, cluster: &str) -> (Vec<ConsumerGroup>, Vec<FetchFailure>) {
        let mut failures = Vec::new();
        if !self.toggles.any_group_family() {
            return (Vec::new(), failures);
        }

        let names = match self.client.list_consumer_groups(cluster).await {
            Ok(names) => names,
            Err(e) => {
                failures.push(failure(cluster, "consumer groups".to_string(), e));
                return (Vec::new(), failures);
            },
        };

        let results: Vec<(String, ClientResult<ConsumerGroup>)> = stream::iter(names)
            .filter(|g| std::future::ready(self.filters.matches_consumer_group(g)))
            .map(|g| async move {
                let res = self.client.get_consumer_group(cluster, &g).await;
                (g, res)
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut groups = Vec::with_capacity(results.len());
        for (name, res) in results {
            match res {
                Ok(mut g) => {
                    g.partitions.retain(|p| self.filters.matches_topic(&p.topic));
                    groups.push(g);
                },
                Err(e) => failures.push(failure(cluster, format!("consumer group '{name}'"), e)),
            }
        }

        (groups, failures)
    }
}

/// Log a failed fetch, and turn it into a [`FetchFailure`].
fn failure(cluster: &str, entity: String, e: ClientError) -> FetchFailure {
    log!(e.log_level(), "Failed to fetch {entity} of cluster '{cluster}': {e}");

    FetchFailure {
        entity,
        kind: e.kind(),
    }
}

/// Set the partitions max offset of each group from the matching topic detail, where missing.
fn fill_max_offsets(groups: &mut [ConsumerGroup], topics: &[Topic]) {
    let by_name: HashMap<&str, &Topic> = topics.iter().map(|t| (t.name.as_str(), t)).collect();

    for p in groups.iter_mut().flat_map(|g| g.partitions.iter_mut()) {
        if p.max_offset.is_none() {
            p.max_offset = by_name.get(p.topic.as_str()).and_then(|t| t.max_offset(p.partition));
        }
    }
}

#[cfg(test)]
mod test {
    use super::fill_max_offsets;
    use crate::burrow_types::{ConsumerGroup, PartitionStatus, Topic};

    #[test]
    fn fill_max_offsets_from_topics() {
        let mut groups = vec![ConsumerGroup {
            name: "g".to_string(),
            partitions: vec![
                PartitionStatus {
                    topic: "invoices".to_string(),
                    partition: 1,
                    current_offset: Some(10),
                    ..Default::default()
                },
                PartitionStatus {
                    topic: "invoices".to_string(),
                    partition: 7,
                    ..Default::default()
                },
                PartitionStatus {
                    topic: "unknown".to_string(),
                    partition: 0,
                    ..Default::default()
                },
                PartitionStatus {
                    topic: "invoices".to_string(),
                    partition: 0,
                    max_offset: Some(3),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];
        let topics = vec![Topic {
            name: "invoices".to_string(),
            partition_max_offsets: vec![100, 30],
        }];

        fill_max_offsets(&mut groups, &topics);

        let maxes: Vec<Option<i64>> = groups[0].partitions.iter().map(|p| p.max_offset).collect();
        assert_eq!(maxes, vec![Some(30), None, None, Some(3)]);
        assert_eq!(groups[0].partitions[0].lag(), Some(20));
    }
}

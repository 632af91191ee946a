use crate::burrow_types::ConsumerGroup;
use crate::config::MetricToggles;
use crate::prometheus_metrics::{
    FamilyDef, MetricPublisher, FETCH_ERRORS_TOTAL, GROUP_STATUS, LABEL_CLUSTER, LABEL_GROUP,
    LABEL_KIND, LABEL_PARTITION, LABEL_TOPIC, PARTITION_CURRENT_OFFSET, PARTITION_LAG,
    PARTITION_MAX_OFFSET, PARTITION_STATUS, TOPIC_PARTITION_OFFSET, TOTAL_LAG,
};

use super::scrape::{ClusterSnapshot, Snapshot};

/// Turn a [`Snapshot`] into metric values, for the families enabled in `toggles`.
///
/// Every series written here is keyed by a distinct `(cluster, group, topic, partition)`
/// or `(cluster, topic, partition)` tuple, so there is exactly one write per series.
pub fn publish_snapshot(
    snapshot: &Snapshot,
    toggles: &MetricToggles,
    publisher: &dyn MetricPublisher,
) {
    for cluster in snapshot.clusters.iter() {
        publish_failures(cluster, publisher);

        for group in cluster.groups.iter() {
            publish_group(group, toggles, publisher);
        }

        if toggles.topic_partition_offset {
            for topic in cluster.topics.iter() {
                for (partition, offset) in topic.partition_max_offsets.iter().enumerate() {
                    let partition = partition.to_string();
                    set(
                        publisher,
                        &TOPIC_PARTITION_OFFSET,
                        &[
                            (LABEL_CLUSTER, cluster.name.as_str()),
                            (LABEL_TOPIC, topic.name.as_str()),
                            (LABEL_PARTITION, partition.as_str()),
                        ],
                        *offset as f64,
                    );
                }
            }
        }
    }
}

fn publish_failures(cluster: &ClusterSnapshot, publisher: &dyn MetricPublisher) {
    for f in cluster.failures.iter() {
        let labels = [(LABEL_CLUSTER, cluster.name.as_str()), (LABEL_KIND, f.kind)];
        if let Err(e) = publisher.inc_counter(FETCH_ERRORS_TOTAL.name, &labels, 1.0) {
            error!("Failed to publish '{}': {e}", FETCH_ERRORS_TOTAL.name);
        }
    }
}

fn publish_group(group: &ConsumerGroup, toggles: &MetricToggles, publisher: &dyn MetricPublisher) {
    let cluster = group.cluster.as_str();
    let group_labels = [(LABEL_CLUSTER, cluster), (LABEL_GROUP, group.name.as_str())];

    if toggles.group_status {
        set(publisher, &GROUP_STATUS, &group_labels, group.status.metric_value());
    }

    if toggles.total_lag {
        set(publisher, &TOTAL_LAG, &group_labels, group.total_lag() as f64);
    }

    for p in group.partitions.iter() {
        let partition = p.partition.to_string();
        let labels = [
            (LABEL_CLUSTER, cluster),
            (LABEL_GROUP, group.name.as_str()),
            (LABEL_TOPIC, p.topic.as_str()),
            (LABEL_PARTITION, partition.as_str()),
        ];

        if toggles.partition_status {
            set(publisher, &PARTITION_STATUS, &labels, p.status.metric_value());
        }

        if toggles.partition_lag {
            if let Some(lag) = p.lag() {
                if lag < 0 {
                    warn!(
                        "Negative lag {lag} for group '{}' on '{}:{}' of cluster '{cluster}'",
                        group.name, p.topic, p.partition
                    );
                }
                set(publisher, &PARTITION_LAG, &labels, lag as f64);
            }
        }

        if toggles.partition_current_offset {
            if let Some(offset) = p.current_offset {
                set(publisher, &PARTITION_CURRENT_OFFSET, &labels, offset as f64);
            }
        }

        if toggles.partition_max_offset {
            if let Some(offset) = p.max_offset {
                set(publisher, &PARTITION_MAX_OFFSET, &labels, offset as f64);
            }
        }
    }
}

fn set(publisher: &dyn MetricPublisher, family: &FamilyDef, labels: &[(&str, &str)], value: f64) {
    if let Err(e) = publisher.set_gauge(family.name, labels, value) {
        error!("Failed to publish '{}': {e}", family.name);
    }
}

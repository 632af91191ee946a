use const_format::formatcp;

use super::{
    LABEL_CLUSTER, LABEL_GROUP, LABEL_KIND, LABEL_OUTCOME, LABEL_PARTITION, LABEL_TOPIC, NAMESPACE,
};

/// Definition of a metric family: a name, its help text and the label names of its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyDef {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const GROUP_LABELS: &[&str] = &[LABEL_CLUSTER, LABEL_GROUP];
const GROUP_PARTITION_LABELS: &[&str] = &[LABEL_CLUSTER, LABEL_GROUP, LABEL_TOPIC, LABEL_PARTITION];
const TOPIC_PARTITION_LABELS: &[&str] = &[LABEL_CLUSTER, LABEL_TOPIC, LABEL_PARTITION];

// ------------------------------------------------------------------------------ Consumer Groups
pub const PARTITION_STATUS: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_partition_status"),
    help: "The status of a partition as reported by Burrow (NOTFOUND=0, OK=1, WARN=2, ERR=3, STOP=4, STALL=5, REWIND=6, unknown=-1).",
    labels: GROUP_PARTITION_LABELS,
};

pub const PARTITION_LAG: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_partition_lag"),
    help: "The lag of the latest offset consumed by the group on the partition. Negative values signal inconsistent data upstream.",
    labels: GROUP_PARTITION_LABELS,
};

pub const PARTITION_CURRENT_OFFSET: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_partition_current_offset"),
    help: "The latest offset committed by the group on the partition.",
    labels: GROUP_PARTITION_LABELS,
};

pub const PARTITION_MAX_OFFSET: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_partition_max_offset"),
    help: "The log-end offset of the partition consumed by the group.",
    labels: GROUP_PARTITION_LABELS,
};

pub const TOTAL_LAG: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_total_lag"),
    help: "The total lag of the group across all partitions, as reported by Burrow when available.",
    labels: GROUP_LABELS,
};

pub const GROUP_STATUS: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_status"),
    help: "The status of the group as reported by Burrow (NOTFOUND=0, OK=1, WARN=2, ERR=3, STOP=4, STALL=5, REWIND=6, unknown=-1).",
    labels: GROUP_LABELS,
};

// ----------------------------------------------------------------------------------- Topics
pub const TOPIC_PARTITION_OFFSET: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_topic_partition_offset"),
    help: "The log-end offset of the topic partition.",
    labels: TOPIC_PARTITION_LABELS,
};

// -------------------------------------------------------------------------- Exporter internals
pub const SCRAPES_TOTAL: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_exporter_scrapes_total"),
    help: "Scrape cycles run, by outcome.",
    labels: &[LABEL_OUTCOME],
};

pub const FETCH_ERRORS_TOTAL: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_exporter_fetch_errors_total"),
    help: "Requests to Burrow that failed, by cluster and kind of error.",
    labels: &[LABEL_CLUSTER, LABEL_KIND],
};

pub const LAST_SCRAPE_DURATION: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_exporter_last_scrape_duration_seconds"),
    help: "Time (seconds) taken by the latest successful scrape cycle.",
    labels: &[],
};

pub const LAST_SCRAPE_TIMESTAMP: FamilyDef = FamilyDef {
    name: formatcp!("{NAMESPACE}_exporter_last_scrape_timestamp_seconds"),
    help: "UTC timestamp (seconds) of the end of the latest successful scrape cycle.",
    labels: &[],
};

/// All the gauge families, registered when the publisher is created.
pub const GAUGES: &[FamilyDef] = &[
    PARTITION_STATUS,
    PARTITION_LAG,
    PARTITION_CURRENT_OFFSET,
    PARTITION_MAX_OFFSET,
    TOTAL_LAG,
    GROUP_STATUS,
    TOPIC_PARTITION_OFFSET,
    LAST_SCRAPE_DURATION,
    LAST_SCRAPE_TIMESTAMP,
];

/// All the counter families, registered when the publisher is created.
pub const COUNTERS: &[FamilyDef] = &[SCRAPES_TOTAL, FETCH_ERRORS_TOTAL];

use super::Status;

/// Status of a single Topic Partition, as consumed by a [`ConsumerGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionStatus {
    pub topic: String,
    pub partition: u32,

    /// Offset the group has committed, if it committed any.
    pub current_offset: Option<i64>,

    /// Latest (log-end) offset of the partition, if known.
    pub max_offset: Option<i64>,

    /// Lag as reported by Burrow, used only when it can't be computed from the offsets.
    pub reported_lag: Option<i64>,

    pub status: Status,
}

impl PartitionStatus {
    /// Lag of the group on this partition.
    ///
    /// It's `max_offset - current_offset` when both are known, otherwise what Burrow reported.
    /// A negative result is returned as-is: it signals an inconsistency upstream.
    pub fn lag(&self) -> Option<i64> {
        match (self.max_offset, self.current_offset) {
            (Some(max), Some(current)) => Some(max - current),
            _ => self.reported_lag,
        }
    }
}

/// A Consumer Group, as evaluated by Burrow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsumerGroup {
    pub cluster: String,
    pub name: String,
    pub status: Status,
    pub partitions: Vec<PartitionStatus>,

    /// Total lag across partitions, as reported by Burrow.
    pub reported_total_lag: Option<i64>,
}

impl ConsumerGroup {
    /// Total lag of the group.
    ///
    /// Burrow's own total is authoritative when present. Otherwise it's the sum of the
    /// non-negative partition lags.
    pub fn total_lag(&self) -> i64 {
        self.reported_total_lag.unwrap_or_else(|| {
            self.partitions.iter().filter_map(PartitionStatus::lag).filter(|l| *l > 0).sum()
        })
    }
}

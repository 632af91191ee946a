/// A Topic, as known to Burrow for a specific cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Topic {
    pub name: String,

    /// Latest (log-end) offset of each partition, indexed by partition number.
    pub partition_max_offsets: Vec<i64>,
}

impl Topic {
    pub fn max_offset(&self, partition: u32) -> Option<i64> {
        self.partition_max_offsets.get(partition as usize).copied()
    }
}

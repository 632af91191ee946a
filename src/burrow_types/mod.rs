mod consumer_group;
mod status;
mod topic;

pub use consumer_group::{ConsumerGroup, PartitionStatus};
pub use status::Status;
pub use topic::Topic;

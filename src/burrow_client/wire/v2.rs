use serde::Deserialize;

use crate::burrow_types::{ConsumerGroup, PartitionStatus, Status};

#[derive(Debug, Deserialize)]
struct LagResponse {
    status: GroupStatus,
}

#[derive(Debug, Deserialize)]
struct GroupStatus {
    status: Status,
    #[serde(default)]
    partitions: Vec<Partition>,
    #[serde(default)]
    totallag: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Partition {
    topic: String,
    partition: u32,
    status: Status,
    end: Option<OffsetEntry>,
}

/// In v2, offsets entries carry the partition max offset alongside the lag.
#[derive(Debug, Deserialize)]
struct OffsetEntry {
    offset: Option<i64>,
    lag: Option<i64>,
    max_offset: Option<i64>,
}

pub(in crate::burrow_client) fn decode_consumer_group(
    cluster: &str,
    group: &str,
    body: &[u8],
) -> serde_json::Result<ConsumerGroup> {
    let res: LagResponse = serde_json::from_slice(body)?;

    Ok(ConsumerGroup {
        cluster: cluster.to_string(),
        name: group.to_string(),
        status: res.status.status,
        partitions: res
            .status
            .partitions
            .into_iter()
            .map(|p| {
                let (current_offset, reported_lag, max_offset) = match p.end {
                    Some(e) => (e.offset, e.lag, e.max_offset),
                    None => (None, None, None),
                };

                PartitionStatus {
                    topic: p.topic,
                    partition: p.partition,
                    current_offset,
                    max_offset,
                    reported_lag,
                    status: p.status,
                }
            })
            .collect(),
        reported_total_lag: res.status.totallag,
    })
}

#[cfg(test)]
mod test {
    use super::decode_consumer_group;
    use crate::burrow_types::Status;

    const LAG_BODY: &str = r#"{
        "error": false,
        "message": "consumer group status returned",
        "status": {
            "cluster": "prod",
            "group": "billing-consumer",
            "status": "WARN",
            "complete": true,
            "partitions": [
                {
                    "topic": "invoices",
                    "partition": 0,
                    "status": "OK",
                    "start": {"offset": 90, "timestamp": 1700000000000, "lag": 45, "max_offset": 135},
                    "end": {"offset": 100, "timestamp": 1700000060000, "lag": 50, "max_offset": 150}
                },
                {
                    "topic": "invoices",
                    "partition": 1,
                    "status": "STALL",
                    "start": null,
                    "end": null
                }
            ],
            "partition_count": 2,
            "maxlag": null,
            "totallag": 50
        }
    }"#;

    #[test]
    fn decode() {
        let g = decode_consumer_group("prod", "billing-consumer", LAG_BODY.as_bytes()).unwrap();

        assert_eq!(g.cluster, "prod");
        assert_eq!(g.name, "billing-consumer");
        assert_eq!(g.status, Status::Warn);
        assert_eq!(g.reported_total_lag, Some(50));
        assert_eq!(g.partitions.len(), 2);

        let p0 = &g.partitions[0];
        assert_eq!(p0.topic, "invoices");
        assert_eq!(p0.partition, 0);
        assert_eq!(p0.current_offset, Some(100));
        assert_eq!(p0.max_offset, Some(150));
        assert_eq!(p0.lag(), Some(50));
        assert_eq!(p0.status, Status::Ok);

        let p1 = &g.partitions[1];
        assert_eq!(p1.status, Status::Stall);
        assert_eq!(p1.current_offset, None);
        assert_eq!(p1.lag(), None);
    }

    #[test]
    fn decode_rejects_malformed() {
        assert!(decode_consumer_group("prod", "g", br#"{"status": {"partitions": []}}"#).is_err());
        assert!(decode_consumer_group("prod", "g", b"<html>").is_err());
    }
}

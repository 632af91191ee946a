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
    #[serde(default)]
    current_lag: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OffsetEntry {
    offset: Option<i64>,
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
            .map(|p| PartitionStatus {
                topic: p.topic,
                partition: p.partition,
                current_offset: p.end.and_then(|e| e.offset),
                // v3 doesn't report it: filled in from the topic detail, if available
                max_offset: None,
                reported_lag: p.current_lag,
                status: p.status,
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
        "message": "consumer status returned",
        "status": {
            "cluster": "prod",
            "group": "billing-consumer",
            "status": "OK",
            "complete": 1.0,
            "partitions": [
                {
                    "topic": "invoices",
                    "partition": 0,
                    "owner": "/10.0.0.1",
                    "client_id": "billing-1",
                    "status": "OK",
                    "start": {"offset": 90, "timestamp": 1700000000000, "observedAt": 1700000000000, "lag": 40},
                    "end": {"offset": 100, "timestamp": 1700000060000, "observedAt": 1700000060000, "lag": 50},
                    "current_lag": 50,
                    "complete": 1.0
                },
                {
                    "topic": "invoices",
                    "partition": 1,
                    "owner": "",
                    "client_id": "",
                    "status": "STOP",
                    "start": null,
                    "end": null,
                    "current_lag": 0,
                    "complete": 0.0
                }
            ],
            "partition_count": 2,
            "maxlag": null,
            "totallag": 50
        },
        "request": {"url": "/v3/kafka/prod/consumer/billing-consumer/lag", "host": "burrow"}
    }"#;

    #[test]
    fn decode() {
        let g = decode_consumer_group("prod", "billing-consumer", LAG_BODY.as_bytes()).unwrap();

        assert_eq!(g.status, Status::Ok);
        assert_eq!(g.reported_total_lag, Some(50));
        assert_eq!(g.partitions.len(), 2);

        let p0 = &g.partitions[0];
        assert_eq!(p0.current_offset, Some(100));
        assert_eq!(p0.max_offset, None);
        assert_eq!(p0.reported_lag, Some(50));
        assert_eq!(p0.lag(), Some(50));

        let p1 = &g.partitions[1];
        assert_eq!(p1.status, Status::Stop);
        assert_eq!(p1.current_offset, None);
        assert_eq!(p1.lag(), Some(0));
    }

    #[test]
    fn decode_without_totallag() {
        let body = r#"{"status": {"status": "ERR", "partitions": []}}"#;
        let g = decode_consumer_group("prod", "g", body.as_bytes()).unwrap();

        assert_eq!(g.status, Status::Err);
        assert_eq!(g.reported_total_lag, None);
        assert_eq!(g.total_lag(), 0);
    }
}

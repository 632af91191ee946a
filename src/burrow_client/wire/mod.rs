//! Response bodies of the Burrow HTTP API.
//!
//! Listing and topic responses are shared across API versions; consumer group lag
//! responses differ, and live in [`v2`] and [`v3`].

pub(super) mod v2;
pub(super) mod v3;

use serde::Deserialize;

/// Fields every Burrow response carries.
#[derive(Debug, Deserialize)]
pub(super) struct ResponseHeader {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ClusterList {
    pub clusters: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConsumerList {
    pub consumers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TopicList {
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TopicDetail {
    pub offsets: Vec<i64>,
}

#[cfg(test)]
mod test {
    use super::{ClusterList, ResponseHeader, TopicDetail};

    #[test]
    fn header_defaults_when_absent() {
        let h: ResponseHeader = serde_json::from_str(r#"{"clusters":["a"]}"#).unwrap();
        assert!(!h.error);
        assert!(h.message.is_empty());

        let h: ResponseHeader =
            serde_json::from_str(r#"{"error":true,"message":"cluster not found"}"#).unwrap();
        assert!(h.error);
        assert_eq!(h.message, "cluster not found");
    }

    #[test]
    fn decode_lists() {
        let body = r#"{"error":false,"message":"cluster list returned","clusters":["local","prod"],"request":{"url":"/v3/kafka","host":"burrow"}}"#;
        let cl: ClusterList = serde_json::from_str(body).unwrap();
        assert_eq!(cl.clusters, vec!["local", "prod"]);

        let td: TopicDetail = serde_json::from_str(r#"{"offsets":[150,0,42]}"#).unwrap();
        assert_eq!(td.offsets, vec![150, 0, 42]);
    }
}

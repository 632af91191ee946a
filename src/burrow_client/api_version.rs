use crate::burrow_types::ConsumerGroup;
use crate::config::ConfigError;

use super::wire::{v2, v3};

/// Version of the Burrow HTTP API to talk to.
///
/// It selects both the URL prefix and the decoder of consumer group responses,
/// once, for the whole lifetime of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V2,
    V3,
}

impl TryFrom<u8> for ApiVersion {
    type Error = ConfigError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            2 => Ok(ApiVersion::V2),
            3 => Ok(ApiVersion::V3),
            _ => Err(ConfigError::UnsupportedApiVersion(v)),
        }
    }
}

impl ApiVersion {
    pub(super) fn path_segment(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }

    /// Whether consumer group responses carry the max offset of each partition.
    ///
    /// When they don't, it has to be looked up in the topic detail.
    pub fn reports_max_offset(&self) -> bool {
        match self {
            ApiVersion::V2 => true,
            ApiVersion::V3 => false,
        }
    }

    pub(super) fn decode_consumer_group(
        &self,
        cluster: &str,
        group: &str,
        body: &[u8],
    ) -> serde_json::Result<ConsumerGroup> {
        match self {
            ApiVersion::V2 => v2::decode_consumer_group(cluster, group, body),
            ApiVersion::V3 => v3::decode_consumer_group(cluster, group, body),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ApiVersion;
    use crate::config::ConfigError;

    #[test]
    fn from_number() {
        assert_eq!(ApiVersion::try_from(2).unwrap(), ApiVersion::V2);
        assert_eq!(ApiVersion::try_from(3).unwrap(), ApiVersion::V3);
        assert!(matches!(ApiVersion::try_from(1), Err(ConfigError::UnsupportedApiVersion(1))));
        assert!(matches!(ApiVersion::try_from(4), Err(ConfigError::UnsupportedApiVersion(4))));
    }
}

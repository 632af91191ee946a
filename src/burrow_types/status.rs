use serde::Deserialize;

/// Evaluation status assigned by Burrow to a consumer group, or to one of its partitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Status {
    #[serde(rename = "NOTFOUND")]
    NotFound,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "ERR")]
    Err,
    #[serde(rename = "STOP")]
    Stop,
    #[serde(rename = "STALL")]
    Stall,
    #[serde(rename = "REWIND")]
    Rewind,
    /// Status string not known to this exporter.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Numeric value exported for this status.
    pub fn metric_value(&self) -> f64 {
        match self {
            Status::Unknown => -1.0,
            Status::NotFound => 0.0,
            Status::Ok => 1.0,
            Status::Warn => 2.0,
            Status::Err => 3.0,
            Status::Stop => 4.0,
            Status::Stall => 5.0,
            Status::Rewind => 6.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn deserialize_known_and_unknown() {
        let parsed: Vec<Status> =
            serde_json::from_str(r#"["OK","WARN","ERR","STOP","STALL","REWIND","NOTFOUND","WAT"]"#)
                .unwrap();

        assert_eq!(
            parsed,
            vec![
                Status::Ok,
                Status::Warn,
                Status::Err,
                Status::Stop,
                Status::Stall,
                Status::Rewind,
                Status::NotFound,
                Status::Unknown
            ]
        );
    }

    #[test]
    fn defaults_to_unknown() {
        assert_eq!(Status::default(), Status::Unknown);
        assert_eq!(Status::default().metric_value(), -1.0);

        let parsed: Status = serde_json::from_str(r#""NEW_BURROW_STATUS""#).unwrap();
        assert_eq!(parsed, Status::Unknown);
    }

    #[test]
    fn metric_values_are_distinct() {
        let values = [
            Status::Unknown,
            Status::NotFound,
            Status::Ok,
            Status::Warn,
            Status::Err,
            Status::Stop,
            Status::Stall,
            Status::Rewind,
        ]
        .map(|s| s.metric_value());

        for (i, a) in values.iter().enumerate() {
            for b in values[i + 1..].iter() {
                assert_ne!(a, b);
            }
        }
    }
}

use regex::Regex;

use crate::config::ConfigError;

/// Regular expressions selecting which clusters, consumer groups and topics get exported.
///
/// A name is included if its regex matches anywhere in it: patterns are not implicitly
/// anchored, so use `^...$` to require a full match.
#[derive(Debug, Clone)]
pub struct Filters {
    clusters: Regex,
    consumer_groups: Regex,
    topics: Regex,
}

impl Filters {
    /// Compile the three filters, failing on the first invalid pattern.
    ///
    /// # Arguments
    ///
    /// * `clusters` - Pattern for cluster names
    /// * `consumer_groups` - Pattern for consumer group names
    /// * `topics` - Pattern for topic names
    pub fn new(clusters: &str, consumer_groups: &str, topics: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            clusters: compile("clusters", clusters)?,
            consumer_groups: compile("consumer-groups", consumer_groups)?,
            topics: compile("topics", topics)?,
        })
    }

    pub fn matches_cluster(&self, cluster: &str) -> bool {
        self.clusters.is_match(cluster)
    }

    pub fn matches_consumer_group(&self, group: &str) -> bool {
        self.consumer_groups.is_match(group)
    }

    pub fn matches_topic(&self, topic: &str) -> bool {
        self.topics.is_match(topic)
    }
}

fn compile(setting: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
        setting,
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::Filters;
    use crate::config::ConfigError;

    const NAMES: [&str; 5] = ["billing-consumer", "audit-consumer", "billing", "prod", ""];

    #[test]
    fn default_pattern_matches_everything() {
        let f = Filters::new(".*", ".*", ".*").unwrap();

        for n in NAMES {
            assert!(f.matches_cluster(n));
            assert!(f.matches_consumer_group(n));
            assert!(f.matches_topic(n));
        }
    }

    #[test]
    fn restrictive_pattern_selects_exact_subset() {
        let f = Filters::new("^prod$", "billing.*", "consumer").unwrap();

        let clusters: Vec<&str> = NAMES.into_iter().filter(|n| f.matches_cluster(n)).collect();
        assert_eq!(clusters, vec!["prod"]);

        let groups: Vec<&str> =
            NAMES.into_iter().filter(|n| f.matches_consumer_group(n)).collect();
        assert_eq!(groups, vec!["billing-consumer", "billing"]);

        // Unanchored: matches as a substring
        let topics: Vec<&str> = NAMES.into_iter().filter(|n| f.matches_topic(n)).collect();
        assert_eq!(topics, vec!["billing-consumer", "audit-consumer"]);
    }

    #[test]
    fn invalid_pattern_names_the_setting() {
        match Filters::new(".*", ".*", "(unclosed") {
            Err(ConfigError::InvalidRegex {
                setting,
                pattern,
                ..
            }) => {
                assert_eq!(setting, "topics");
                assert_eq!(pattern, "(unclosed");
            },
            other => panic!("Unexpected result: {other:?}"),
        }

        assert!(matches!(
            Filters::new("[", ".*", ".*"),
            Err(ConfigError::InvalidRegex { setting: "clusters", .. })
        ));
    }
}

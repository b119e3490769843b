use nri_spark_config::Labels;
use serde_json::{
    Map,
    Value,
};
use std::collections::btree_map;

pub const DRIVER_HOST_LABEL: &str = "driverHost";
pub const CLUSTER_NAME_LABEL: &str = "clusterName";

/// Environment variable holding a JSON object of extra labels.
pub const NEWRELIC_TAGS_VAR: &str = "NEWRELIC_TAGS";

/// Labels copied into every outgoing event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(Labels);

impl LabelSet {
    /// Builds the label set from the static configuration labels, the optional `NEWRELIC_TAGS` JSON document and
    /// the cluster name. Tags that are not a JSON object are logged and ignored.
    pub fn new(static_labels: &Labels, newrelic_tags: Option<&str>, cluster_name: &str) -> Self {
        let mut labels = static_labels.clone();

        if let Some(raw) = newrelic_tags.filter(|raw| !raw.trim().is_empty()) {
            match serde_json::from_str::<Map<String, Value>>(raw) {
                Ok(tags) => {
                    debug!(count = tags.len(), "Merging {NEWRELIC_TAGS_VAR} into labels");
                    labels.extend(tags.into_iter().map(|(key, value)| (key, label_value(value))));
                }
                Err(err) => {
                    error!("Ignoring {NEWRELIC_TAGS_VAR} as its value is not a valid JSON object: {err}");
                }
            }
        }

        labels.insert(CLUSTER_NAME_LABEL.to_string(), cluster_name.to_string());
        Self(labels)
    }

    /// Reads `NEWRELIC_TAGS` from the process environment.
    pub fn from_env(static_labels: &Labels, cluster_name: &str) -> Self {
        let tags = std::env::var(NEWRELIC_TAGS_VAR).ok();
        Self::new(static_labels, tags.as_deref(), cluster_name)
    }

    /// Returns a copy carrying the resolved driver host.
    pub fn with_driver_host(&self, driver_host: &str) -> Self {
        let mut labels = self.0.clone();
        labels.insert(DRIVER_HOST_LABEL.to_string(), driver_host.to_string());
        Self(labels)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn label_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn static_labels() -> Labels {
        Labels::from([
            ("environment".to_string(), "prod".to_string()),
            ("team".to_string(), "data".to_string()),
        ])
    }

    #[test]
    fn static_labels_and_cluster_name() {
        let labels = LabelSet::new(&static_labels(), None, "analytics");
        assert_eq!(labels.get("environment"), Some("prod"));
        assert_eq!(labels.get(CLUSTER_NAME_LABEL), Some("analytics"));
        assert_eq!(labels.get(DRIVER_HOST_LABEL), None);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn tags_are_merged_over_static_labels() {
        let labels = LabelSet::new(
            &static_labels(),
            Some(r#"{"environment": "staging", "costCenter": 42, "spot": true}"#),
            "analytics",
        );
        assert_eq!(labels.get("environment"), Some("staging"));
        assert_eq!(labels.get("costCenter"), Some("42"));
        assert_eq!(labels.get("spot"), Some("true"));
        assert_eq!(labels.get("team"), Some("data"));
    }

    #[test]
    fn malformed_tags_are_ignored() {
        let expected = LabelSet::new(&static_labels(), None, "analytics");
        assert_eq!(LabelSet::new(&static_labels(), Some("{not json"), "analytics"), expected);
        assert_eq!(LabelSet::new(&static_labels(), Some(r#"["a", "b"]"#), "analytics"), expected);
        assert_eq!(LabelSet::new(&static_labels(), Some(""), "analytics"), expected);
    }

    #[test]
    fn driver_host_is_added_to_a_copy() {
        let labels = LabelSet::new(&static_labels(), None, "analytics");
        let with_host = labels.with_driver_host("10.0.0.5");
        assert_eq!(with_host.get(DRIVER_HOST_LABEL), Some("10.0.0.5"));
        assert_eq!(labels.get(DRIVER_HOST_LABEL), None);
    }

    #[test]
    fn cluster_name_wins_over_tags() {
        let labels = LabelSet::new(&Labels::new(), Some(r#"{"clusterName": "other"}"#), "analytics");
        assert_eq!(labels.get(CLUSTER_NAME_LABEL), Some("analytics"));
    }
}

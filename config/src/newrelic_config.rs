use serde::{
    Deserialize,
    Deserializer,
};
use std::fmt;

pub const US_EVENTS_ENDPOINT: &str = "https://insights-collector.newrelic.com/v1/accounts/{account_id}/events";
pub const EU_EVENTS_ENDPOINT: &str = "https://insights-collector.eu01.nr-data.net/v1/accounts/{account_id}/events";

#[derive(Clone, Debug, Deserialize)]
pub struct NewRelicConfig {
    #[serde(default)]
    pub api_endpoint: ApiEndpoint,
    #[serde(deserialize_with = "string_or_number")]
    pub account_id: String,
    pub api_key: ApiKey,
}

impl NewRelicConfig {
    pub fn events_url(&self) -> String {
        self.api_endpoint.events_url(&self.account_id)
    }
}

/// Where events are posted. `US` and `EU` select the regional collectors, anything else is taken as a URL
/// template that may contain `{account_id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ApiEndpoint {
    #[default]
    Us,
    Eu,
    Template(String),
}

impl ApiEndpoint {
    pub fn template(&self) -> &str {
        match self {
            ApiEndpoint::Us => US_EVENTS_ENDPOINT,
            ApiEndpoint::Eu => EU_EVENTS_ENDPOINT,
            ApiEndpoint::Template(template) => template,
        }
    }

    pub fn events_url(&self, account_id: &str) -> String {
        self.template().replace("{account_id}", account_id)
    }
}

impl From<&str> for ApiEndpoint {
    fn from(value: &str) -> Self {
        match value {
            "US" => ApiEndpoint::Us,
            "EU" => ApiEndpoint::Eu,
            other => ApiEndpoint::Template(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ApiEndpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ApiEndpoint::from(raw.as_str()))
    }
}

/// Insights insert key. Kept out of `Debug` output so the configuration can be logged.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(text) => text,
    })
}

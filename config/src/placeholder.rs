use serde::{
    Deserialize,
    Deserializer,
};
use std::{
    fmt,
    str::FromStr,
};

/// A setting that may only become known at runtime.
///
/// Installer-generated configuration files carry values like `<<MASTER_UI_PORT>>` when the cluster had not yet
/// written its runtime files. Those deserialize to [`Placeholder::Unresolved`] and are filled in later by the
/// collector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placeholder<T> {
    Resolved(T),
    #[default]
    Unresolved,
}

impl<T> Placeholder<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Placeholder::Resolved(_))
    }

    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Placeholder::Resolved(value) => Some(value),
            Placeholder::Unresolved => None,
        }
    }

    pub fn resolve(&mut self, value: T) {
        *self = Placeholder::Resolved(value);
    }
}

impl<T: FromStr> Placeholder<T> {
    /// Interprets a raw textual value. Empty strings and `<<NAME>>` markers are unresolved.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        let raw = raw.trim();
        if raw.is_empty() || is_marker(raw) {
            return Ok(Placeholder::Unresolved);
        }
        raw.parse().map(Placeholder::Resolved)
    }
}

impl<T: fmt::Display> fmt::Display for Placeholder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Resolved(value) => value.fmt(f),
            Placeholder::Unresolved => f.write_str("<unresolved>"),
        }
    }
}

fn is_marker(raw: &str) -> bool {
    raw.len() > 4 && raw.starts_with("<<") && raw.ends_with(">>")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSetting {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl<'de, T> Deserialize<'de> for Placeholder<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match Option::<RawSetting>::deserialize(deserializer)? {
            Some(RawSetting::Unsigned(n)) => Placeholder::parse(&n.to_string()),
            Some(RawSetting::Signed(n)) => Placeholder::parse(&n.to_string()),
            Some(RawSetting::Text(text)) => Placeholder::parse(&text),
            None => Ok(Placeholder::Unresolved),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

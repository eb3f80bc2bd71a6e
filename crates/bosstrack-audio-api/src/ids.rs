use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespaced asset identifier, written `namespace:path`.
///
/// Used for entity types, sound events and raw sound files alike.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    namespace: String,
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("missing ':' separator in '{0}'")]
    MissingSeparator(String),

    #[error("empty namespace or path in '{0}'")]
    Empty(String),

    #[error("invalid character {ch:?} in '{id}'")]
    InvalidChar { id: String, ch: char },
}

impl ResourceId {
    /// Builds an id from already-trusted parts (static tables, tests).
    #[inline]
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let (ns, path) = s
            .split_once(':')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;

        if ns.is_empty() || path.is_empty() {
            return Err(IdParseError::Empty(s.to_string()));
        }

        let ns_ok = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.');
        let path_ok = |c: char| ns_ok(c) || c == '/';

        if let Some(ch) = ns.chars().find(|c| !ns_ok(*c)) {
            return Err(IdParseError::InvalidChar { id: s.to_string(), ch });
        }
        if let Some(ch) = path.chars().find(|c| !path_ok(*c)) {
            return Err(IdParseError::InvalidChar { id: s.to_string(), ch });
        }

        Ok(Self::new(ns, path))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceId {
    type Err = IdParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = IdParseError;

    #[inline]
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ResourceId> for String {
    #[inline]
    fn from(id: ResourceId) -> Self {
        id.to_string()
    }
}

/// Host-side entity handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct EntityId(pub u64);

/// Host-side sound instance handle returned by [`crate::HostAudio::play`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct InstanceId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_and_file_forms() {
        let ev: ResourceId = "mowziesmobs:music.frostmaw_theme".parse().unwrap();
        assert_eq!(ev.namespace(), "mowziesmobs");
        assert_eq!(ev.path(), "music.frostmaw_theme");

        let file = ResourceId::parse("mowziesmobs:music/sculptor/transition").unwrap();
        assert_eq!(file.to_string(), "mowziesmobs:music/sculptor/transition");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(ResourceId::parse("frostmaw"), Err(IdParseError::MissingSeparator(_))));
        assert!(matches!(ResourceId::parse(":frostmaw"), Err(IdParseError::Empty(_))));
        assert!(matches!(
            ResourceId::parse("Mowzie:frostmaw"),
            Err(IdParseError::InvalidChar { ch: 'M', .. })
        ));
        // '/' is only legal in the path.
        assert!(ResourceId::parse("a/b:c").is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use bosstrack_audio_api::ResourceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Boss music settings. Read once at startup, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossMusicConfig {
    /// Namespace our own tracks live in. Music from this namespace is never vetoed.
    #[serde(default = "default_own_namespace")]
    pub own_namespace: String,

    /// Half-width of the scan cube around the listener, in distance units.
    #[serde(default = "default_radius")]
    pub radius: f64,

    #[serde(default = "default_scan_interval_ticks")]
    pub scan_interval_ticks: u32,

    #[serde(default = "default_fade_ticks")]
    pub fade_ticks: u32,

    #[serde(default = "default_triggers")]
    pub triggers: Vec<TriggerBinding>,

    /// Theme sounds muted by logical event name.
    #[serde(default = "default_suppressed_events")]
    pub suppressed_events: Vec<ResourceId>,

    /// Theme sounds muted by raw asset path (played directly, bypassing the event).
    #[serde(default = "default_suppressed_paths")]
    pub suppressed_paths: Vec<ResourceId>,

    #[serde(default)]
    pub director: DirectorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerBinding {
    pub entity: ResourceId,

    /// `None` keeps the override (themes stay muted) without an audible replacement.
    #[serde(default)]
    pub track: Option<ResourceId>,
}

/// Where to look for an external music director library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Library base name; platform prefix/suffix are added at load time.
    #[serde(default = "default_director_library")]
    pub library: String,

    /// Defaults to the directory of the running executable.
    #[serde(default)]
    pub search_dir: Option<PathBuf>,
}

const MOWZIE: &str = "mowziesmobs";
const OWN: &str = "mowziestrackscompat";

fn default_own_namespace() -> String {
    OWN.to_string()
}
fn default_radius() -> f64 {
    20.0
}
fn default_scan_interval_ticks() -> u32 {
    5
}
fn default_fade_ticks() -> u32 {
    20
}
fn default_true() -> bool {
    true
}
fn default_director_library() -> String {
    "overhauledmusic".to_string()
}

fn default_triggers() -> Vec<TriggerBinding> {
    [
        ("ferrous_wroughtnaut", "ferrous_wroughtnaut_boss"),
        ("umvuthi", "umvuthi_boss"),
        ("frostmaw", "frostmaw_boss"),
    ]
    .into_iter()
    .map(|(entity, track)| TriggerBinding {
        entity: ResourceId::new(MOWZIE, entity),
        track: Some(ResourceId::new(OWN, track)),
    })
    .collect()
}

fn default_suppressed_events() -> Vec<ResourceId> {
    [
        "music.ferrous_wroughtnaut_theme",
        "music.umvuthi_theme",
        "music.frostmaw_theme",
        "music.sculptor_theme",
        "music.sculptor_transition",
    ]
    .into_iter()
    .map(|p| ResourceId::new(MOWZIE, p))
    .collect()
}

fn default_suppressed_paths() -> Vec<ResourceId> {
    [
        "music/ferrous_wroughtnaut",
        "music/umvuthi",
        "music/frostmaw",
        "music/sculptor/ferrous_wroughtnaut",
        "music/sculptor/transition",
    ]
    .into_iter()
    .map(|p| ResourceId::new(MOWZIE, p))
    .collect()
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            library: default_director_library(),
            search_dir: None,
        }
    }
}

impl Default for BossMusicConfig {
    fn default() -> Self {
        Self {
            own_namespace: default_own_namespace(),
            radius: default_radius(),
            scan_interval_ticks: default_scan_interval_ticks(),
            fade_ticks: default_fade_ticks(),
            triggers: default_triggers(),
            suppressed_events: default_suppressed_events(),
            suppressed_paths: default_suppressed_paths(),
            director: DirectorConfig::default(),
        }
    }
}

impl BossMusicConfig {
    /// Missing or unreadable file yields the defaults; a file that exists but does not parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) => {
                log::debug!(target: "boss_music", "config '{}' not read ({e}); using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    #[inline]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if ResourceId::parse(&format!("{}:x", self.own_namespace)).is_err() {
            return invalid(format!("own_namespace '{}' is not a valid namespace", self.own_namespace));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return invalid(format!("radius must be a positive number, got {}", self.radius));
        }
        if self.scan_interval_ticks == 0 {
            return invalid("scan_interval_ticks must be > 0".into());
        }
        if self.fade_ticks == 0 {
            return invalid("fade_ticks must be > 0".into());
        }

        let suppressed = self.suppression_list();
        let mut seen = HashSet::new();
        for b in &self.triggers {
            if !seen.insert(&b.entity) {
                return invalid(format!("trigger '{}' listed twice", b.entity));
            }
            if let Some(track) = &b.track {
                if track.namespace() != self.own_namespace {
                    return invalid(format!(
                        "track '{track}' must live in own namespace '{}'",
                        self.own_namespace
                    ));
                }
                if suppressed.matches(track) {
                    return invalid(format!("track '{track}' is also suppressed"));
                }
            }
        }

        let events: HashSet<_> = self.suppressed_events.iter().collect();
        if let Some(dup) = self.suppressed_paths.iter().find(|p| events.contains(p)) {
            return invalid(format!("'{dup}' is in both suppressed_events and suppressed_paths"));
        }

        Ok(())
    }

    pub fn trigger_table(&self) -> TriggerTable {
        TriggerTable::from_bindings(&self.triggers)
    }

    pub fn suppression_list(&self) -> SuppressionList {
        SuppressionList::new(self.suppressed_events.clone(), self.suppressed_paths.clone())
    }
}

/// Trigger entity → replacement track lookup, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct TriggerTable {
    order: Vec<ResourceId>,
    tracks: HashMap<ResourceId, Option<ResourceId>>,
}

impl TriggerTable {
    pub fn from_bindings(bindings: &[TriggerBinding]) -> Self {
        let mut table = Self::default();
        for b in bindings {
            if table.tracks.insert(b.entity.clone(), b.track.clone()).is_none() {
                table.order.push(b.entity.clone());
            }
        }
        table
    }

    #[inline]
    pub fn contains(&self, entity: &ResourceId) -> bool {
        self.tracks.contains_key(entity)
    }

    /// `None` both for unknown entities and for triggers without a track.
    #[inline]
    pub fn track_for(&self, entity: &ResourceId) -> Option<&ResourceId> {
        self.tracks.get(entity).and_then(Option::as_ref)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ResourceId> {
        self.order.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Sounds that are vetoed and muted unconditionally.
#[derive(Debug, Clone, Default)]
pub struct SuppressionList {
    events: Vec<ResourceId>,
    paths: Vec<ResourceId>,
    lookup: HashSet<ResourceId>,
}

impl SuppressionList {
    pub fn new(events: Vec<ResourceId>, paths: Vec<ResourceId>) -> Self {
        let lookup = events.iter().chain(paths.iter()).cloned().collect();
        Self { events, paths, lookup }
    }

    #[inline]
    pub fn matches(&self, id: &ResourceId) -> bool {
        self.lookup.contains(id)
    }

    /// Event ids first, then raw paths.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ResourceId> {
        self.events.iter().chain(self.paths.iter())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len() + self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_tables() {
        let cfg = BossMusicConfig::default();
        cfg.validate().unwrap();

        assert_eq!(cfg.radius, 20.0);
        assert_eq!(cfg.scan_interval_ticks, 5);
        assert_eq!(cfg.fade_ticks, 20);
        assert_eq!(cfg.triggers.len(), 3);
        assert_eq!(cfg.suppressed_events.len(), 5);
        assert_eq!(cfg.suppressed_paths.len(), 5);

        let table = cfg.trigger_table();
        let frostmaw = ResourceId::new("mowziesmobs", "frostmaw");
        assert_eq!(
            table.track_for(&frostmaw),
            Some(&ResourceId::new("mowziestrackscompat", "frostmaw_boss"))
        );
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let cfg = BossMusicConfig::from_toml_str(
            r#"
            radius = 32.0

            [[triggers]]
            entity = "mowziesmobs:sculptor"

            [director]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.radius, 32.0);
        assert_eq!(cfg.fade_ticks, 20);
        assert_eq!(cfg.triggers.len(), 1);
        assert_eq!(cfg.triggers[0].track, None);
        assert!(!cfg.director.enabled);
        assert_eq!(cfg.director.library, "overhauledmusic");
        assert_eq!(cfg.suppressed_paths.len(), 5);
        cfg.validate().unwrap();
    }

    #[test]
    fn malformed_ids_fail_to_parse() {
        let r = BossMusicConfig::from_toml_str(r#"suppressed_events = ["no_namespace"]"#);
        assert!(r.is_err());
    }

    #[test]
    fn validate_rejects_foreign_tracks_and_overlaps() {
        let mut cfg = BossMusicConfig::default();
        cfg.triggers[0].track = Some(ResourceId::new("othermod", "boss"));
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = BossMusicConfig::default();
        cfg.suppressed_paths.push(cfg.suppressed_events[0].clone());
        assert!(cfg.validate().is_err());

        let mut cfg = BossMusicConfig::default();
        let dup = cfg.triggers[0].clone();
        cfg.triggers.push(dup);
        assert!(cfg.validate().is_err());

        let mut cfg = BossMusicConfig::default();
        cfg.scan_interval_ticks = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = BossMusicConfig::default();
        cfg.radius = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = BossMusicConfig::load_or_default("/nonexistent/bosstrack.toml").unwrap();
        assert_eq!(cfg.own_namespace, "mowziestrackscompat");
    }

    #[test]
    fn suppression_list_iterates_events_then_paths() {
        let list = BossMusicConfig::default().suppression_list();
        let all: Vec<_> = list.iter().collect();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].path(), "music.ferrous_wroughtnaut_theme");
        assert_eq!(all[5].path(), "music/ferrous_wroughtnaut");
        assert!(list.matches(&ResourceId::new("mowziesmobs", "music/sculptor/transition")));
        assert!(!list.matches(&ResourceId::new("minecraft", "music.game")));
    }
}

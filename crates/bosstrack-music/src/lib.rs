//! Boss music layer.
//!
//! While a configured boss entity is near the listener, the default music is faded
//! out and replaced by a dedicated track. Known intrusive boss themes are muted at
//! all times, so two music tracks never play on top of each other.

pub mod arbitrator;
pub mod bridge;
pub mod channels;
pub mod config;
pub mod dynlib;
pub mod events;
pub mod module;
pub mod scanner;


pub use arbitrator::{Arbitrator, ArbitratorPhase, ArbitratorState, PlayVerdict, VetoGate, VetoReason};
pub use bridge::{AbsentDirector, ExternalMusicBridge, MusicBridge, SharedMusicDirector};
pub use channels::{ChannelController, FadeEnvelope, FadeState, PlaybackChannels, PlaybackHandle};
pub use config::{BossMusicConfig, ConfigError, DirectorConfig, SuppressionList, TriggerBinding, TriggerTable};
pub use events::BossMusicEvent;
pub use module::{BossMusicHandle, BossMusicModule, SharedArbitrator};
pub use scanner::{EntityScanner, ProximityScanner};

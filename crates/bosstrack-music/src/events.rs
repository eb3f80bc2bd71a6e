use bosstrack_audio_api::ResourceId;

use crate::channels::PlaybackHandle;

/// Lifecycle notifications published on the engine bus.
#[derive(Debug, Clone, PartialEq)]
pub enum BossMusicEvent {
    /// A trigger came into range. `external_fade` is true when a music director
    /// accepted the fade request and the track start is deferred.
    OverrideBegan {
        trigger: ResourceId,
        external_fade: bool,
    },
    TrackStarted {
        trigger: ResourceId,
        track: ResourceId,
        handle: PlaybackHandle,
    },
    OverrideEnded {
        trigger: ResourceId,
    },
}

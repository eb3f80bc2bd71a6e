use crate::error::AudioError;
use crate::ids::{InstanceId, ResourceId};
use crate::types::{SoundCategory, SoundInstanceDesc};

/// Host sound engine, as seen by gameplay-side audio controllers.
///
/// Every call may fail; callers decide whether a failure matters.
pub trait HostAudio: Send {
    /// Starts a sound instance. The host owns mixing and streaming.
    fn play(&mut self, desc: SoundInstanceDesc) -> Result<InstanceId, AudioError>;

    /// Sets linear gain of a live instance. Volume is in [0..1].
    fn set_volume(&mut self, instance: InstanceId, volume: f32) -> Result<(), AudioError>;

    /// Stops one instance. Stopping an already finished instance is not an error.
    fn stop_instance(&mut self, instance: InstanceId) -> Result<(), AudioError>;

    /// Stops every instance of `id` routed through `category`.
    fn stop_by_id_and_category(
        &mut self,
        id: &ResourceId,
        category: SoundCategory,
    ) -> Result<(), AudioError>;

    /// Stops every instance routed through `category`, regardless of who started it.
    fn stop_all_in_category(&mut self, category: SoundCategory) -> Result<(), AudioError>;

    /// Stops the host's own background-music player, if it has one.
    fn stop_background_music(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unsupported("stop_background_music"))
    }
}

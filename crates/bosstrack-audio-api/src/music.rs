use crate::error::AudioError;

/// One music instance managed by a third-party music director.
pub trait MusicFader {
    /// Ramps the instance's volume to `target_volume` over `duration_ticks`.
    fn fade_to(&mut self, target_volume: f32, duration_ticks: u32) -> Result<(), AudioError>;

    fn set_active(&mut self, active: bool) -> Result<(), AudioError>;
}

/// Optional third-party music-direction subsystem.
///
/// A host without one hands out an absent director; callers never branch on concrete types.
pub trait MusicDirector: Send {
    fn name(&self) -> &str;

    /// `false` for the stand-in used when nothing was discovered.
    fn is_present(&self) -> bool {
        true
    }

    /// Calls `visit` once per managed instance.
    ///
    /// Returns the number of instances visited, or an error if the director
    /// does not expose its instance table.
    fn visit_instances(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MusicFader),
    ) -> Result<usize, AudioError>;
}

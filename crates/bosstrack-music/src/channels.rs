use bosstrack_audio_api::{
    AudioError, CategoryMask, HostAudio, InstanceId, ResourceId, SoundCategory, SoundInstanceDesc,
};

/// A boss track started through a [`PlaybackChannels`] implementation.
///
/// The controller owns the underlying instance; holders only reference it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeState {
    FadingIn,
    FadingOut,
}

/// Linear per-tick volume ramp of one looping track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeEnvelope {
    fade_ticks: u32,
    age: u32,
    out_age: u32,
    state: FadeState,
    volume: f32,
}

impl FadeEnvelope {
    /// Starts silent and fading in.
    pub fn new(fade_ticks: u32) -> Self {
        Self {
            fade_ticks: fade_ticks.max(1),
            age: 0,
            out_age: 0,
            state: FadeState::FadingIn,
            volume: 0.0,
        }
    }

    #[inline]
    pub fn begin_fade_out(&mut self) {
        self.state = FadeState::FadingOut;
        self.out_age = 0;
    }

    /// Advances one tick. Returns `true` once a fade-out has reached silence.
    pub fn advance(&mut self) -> bool {
        let span = self.fade_ticks as f32;
        match self.state {
            FadeState::FadingIn => {
                self.age = self.age.saturating_add(1);
                self.volume = (self.age as f32 / span).min(1.0);
                false
            }
            FadeState::FadingOut => {
                self.out_age += 1;
                self.volume = (1.0 - self.out_age as f32 / span).max(0.0);
                self.out_age >= self.fade_ticks
            }
        }
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[inline]
    pub fn state(&self) -> FadeState {
        self.state
    }
}

/// Output side of the boss music layer.
pub trait PlaybackChannels: Send {
    /// Stops `id` on every channel a theme can play through. Never fails outward.
    fn mute_matching(&mut self, id: &ResourceId);

    /// Stops everything routed through `category`, whoever started it.
    fn stop_category(&mut self, category: SoundCategory) -> Result<(), AudioError>;

    /// Starts a looping, positionless music track at zero volume, fading in.
    fn start(&mut self, track: &ResourceId) -> Result<PlaybackHandle, AudioError>;

    /// Switches the track to fading out; it stops itself once silent.
    ///
    /// Fails for handles this channel set no longer owns.
    fn request_fade_out(&mut self, handle: PlaybackHandle) -> Result<(), AudioError>;

    fn stop_now(&mut self, handle: PlaybackHandle) -> Result<(), AudioError>;

    /// Per-tick envelope pass over all owned tracks.
    fn advance(&mut self);

    /// Still audible (fading in, playing, or fading out).
    fn is_active(&self, handle: PlaybackHandle) -> bool;
}

struct LiveTrack {
    handle: PlaybackHandle,
    instance: InstanceId,
    track: ResourceId,
    envelope: FadeEnvelope,
}

/// [`PlaybackChannels`] on top of the host sound engine.
pub struct ChannelController {
    host: Box<dyn HostAudio>,
    own_namespace: String,
    fade_ticks: u32,
    mute_mask: CategoryMask,
    live: Vec<LiveTrack>,
    next_handle: u64,
}

impl ChannelController {
    pub fn new(host: Box<dyn HostAudio>, own_namespace: impl Into<String>, fade_ticks: u32) -> Self {
        Self {
            host,
            own_namespace: own_namespace.into(),
            fade_ticks,
            mute_mask: CategoryMask::INTRUSIVE,
            live: Vec::new(),
            next_handle: 1,
        }
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl PlaybackChannels for ChannelController {
    fn mute_matching(&mut self, id: &ResourceId) {
        for category in self.mute_mask.categories() {
            if let Err(e) = self.host.stop_by_id_and_category(id, category) {
                log::debug!(target: "boss_music", "mute {id} on {category:?} failed: {e}");
            }
        }
    }

    fn stop_category(&mut self, category: SoundCategory) -> Result<(), AudioError> {
        // Boss tracks are always music; drop ours first so nothing dangles if the host call fails.
        if category == SoundCategory::Music {
            for t in self.live.drain(..) {
                if let Err(e) = self.host.stop_instance(t.instance) {
                    log::debug!(target: "boss_music", "stop {} failed: {e}", t.track);
                }
            }
        }

        match self.host.stop_all_in_category(category) {
            Ok(()) => Ok(()),
            Err(e) if category == SoundCategory::Music => {
                log::debug!(target: "boss_music", "category stop failed ({e}); stopping background music instead");
                self.host.stop_background_music().map_err(|_| e)
            }
            Err(e) => Err(e),
        }
    }

    fn start(&mut self, track: &ResourceId) -> Result<PlaybackHandle, AudioError> {
        if track.namespace() != self.own_namespace {
            return Err(AudioError::rejected(
                "start",
                format!("track {track} is outside namespace '{}'", self.own_namespace),
            ));
        }

        let instance = self.host.play(SoundInstanceDesc::music_loop(track.clone()))?;

        let handle = PlaybackHandle(self.next_handle);
        self.next_handle += 1;
        self.live.push(LiveTrack {
            handle,
            instance,
            track: track.clone(),
            envelope: FadeEnvelope::new(self.fade_ticks),
        });
        Ok(handle)
    }

    fn request_fade_out(&mut self, handle: PlaybackHandle) -> Result<(), AudioError> {
        let t = self
            .live
            .iter_mut()
            .find(|t| t.handle == handle)
            .ok_or_else(|| AudioError::rejected("fade_out", format!("boss track {handle:?} is not live")))?;
        t.envelope.begin_fade_out();
        Ok(())
    }

    fn stop_now(&mut self, handle: PlaybackHandle) -> Result<(), AudioError> {
        let Some(pos) = self.live.iter().position(|t| t.handle == handle) else {
            return Ok(());
        };
        let t = self.live.remove(pos);
        self.host.stop_instance(t.instance)
    }

    fn advance(&mut self) {
        let host = &mut self.host;
        self.live.retain_mut(|t| {
            let finished = t.envelope.advance();
            if finished {
                if let Err(e) = host.stop_instance(t.instance) {
                    log::debug!(target: "boss_music", "stop {} after fade failed: {e}", t.track);
                }
                return false;
            }
            if let Err(e) = host.set_volume(t.instance, t.envelope.volume()) {
                log::debug!(target: "boss_music", "volume update for {} failed: {e}", t.track);
            }
            true
        });
    }

    #[inline]
    fn is_active(&self, handle: PlaybackHandle) -> bool {
        self.live.iter().any(|t| t.handle == handle)
    }
}

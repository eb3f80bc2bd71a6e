use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bosstrack_audio_api::{Listener, PlayRequest, PlaySoundEvent, ResourceId, SoundCategory};

use crate::bridge::MusicBridge;
use crate::channels::{PlaybackChannels, PlaybackHandle};
use crate::config::{BossMusicConfig, SuppressionList, TriggerTable};
use crate::events::BossMusicEvent;
use crate::scanner::ProximityScanner;

const LOG: &str = "boss_music";

/// Session state of the boss music layer.
///
/// Invariant: `current_playback.is_some()` implies `active_trigger.is_some()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArbitratorState {
    /// Trigger we are overriding music for. `None` is the steady state.
    pub active_trigger: Option<ResourceId>,
    /// Ticks left until the boss track hard-starts after an external fade. 0 = not waiting.
    pub pending_start_ticks: u32,
    pub current_playback: Option<PlaybackHandle>,
    pub scan_cooldown: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbitratorPhase {
    Idle,
    /// `pending_start`: the predecessor is still fading out, our track has not started yet.
    Overriding { pending_start: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VetoReason {
    SuppressedTheme,
    ForeignMusicDuringOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayVerdict {
    Allow,
    Veto(VetoReason),
}

impl PlayVerdict {
    #[inline]
    pub fn is_veto(self) -> bool {
        matches!(self, PlayVerdict::Veto(_))
    }
}

/// Veto rules shared with host sound hooks.
///
/// Hosts may fire their pre-play hook synchronously from inside `HostAudio::play`,
/// i.e. while a tick holds the arbitrator. The gate therefore never takes that lock:
/// the rules are immutable and the override flag is atomic.
#[derive(Debug)]
pub struct VetoGate {
    own_namespace: String,
    suppressed: SuppressionList,
    overriding: AtomicBool,
}

impl VetoGate {
    pub fn new(own_namespace: impl Into<String>, suppressed: SuppressionList) -> Self {
        Self {
            own_namespace: own_namespace.into(),
            suppressed,
            overriding: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_overriding(&self) -> bool {
        self.overriding.load(Ordering::Acquire)
    }

    #[inline]
    fn set_overriding(&self, on: bool) {
        self.overriding.store(on, Ordering::Release);
    }

    /// Pre-play veto, evaluated for every sound the host is about to start.
    pub fn check(&self, request: &PlayRequest) -> PlayVerdict {
        if self.suppressed.matches(&request.sound) {
            return PlayVerdict::Veto(VetoReason::SuppressedTheme);
        }

        if self.is_overriding()
            && request.category == SoundCategory::Music
            && request.namespace() != self.own_namespace
        {
            return PlayVerdict::Veto(VetoReason::ForeignMusicDuringOverride);
        }

        PlayVerdict::Allow
    }

    /// Host hook adapter: cancels the event in place when vetoed.
    pub fn on_play_sound(&self, event: &mut PlaySoundEvent) -> PlayVerdict {
        let Some(request) = event.sound.as_ref() else {
            return PlayVerdict::Allow;
        };

        let verdict = self.check(request);
        if let PlayVerdict::Veto(reason) = verdict {
            log::trace!(target: LOG, "vetoed {} ({reason:?})", request.sound);
            event.cancel();
        }
        verdict
    }
}

/// Decides, tick by tick, whether boss music should replace the regular music.
///
/// Collaborator failures never escape: they are logged and the call is treated as a no-op.
pub struct Arbitrator {
    radius: f64,
    scan_interval: u32,
    fade_ticks: u32,
    triggers: Arc<TriggerTable>,
    gate: Arc<VetoGate>,

    scanner: Box<dyn ProximityScanner>,
    bridge: Box<dyn MusicBridge>,
    channels: Box<dyn PlaybackChannels>,

    state: ArbitratorState,
    outbox: Vec<BossMusicEvent>,
}

impl Arbitrator {
    pub fn new(
        config: &BossMusicConfig,
        triggers: Arc<TriggerTable>,
        scanner: Box<dyn ProximityScanner>,
        bridge: Box<dyn MusicBridge>,
        channels: Box<dyn PlaybackChannels>,
    ) -> Self {
        Self {
            radius: config.radius,
            scan_interval: config.scan_interval_ticks.max(1),
            fade_ticks: config.fade_ticks,
            triggers,
            gate: Arc::new(VetoGate::new(config.own_namespace.clone(), config.suppression_list())),
            scanner,
            bridge,
            channels,
            state: ArbitratorState::default(),
            outbox: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &ArbitratorState {
        &self.state
    }

    pub fn phase(&self) -> ArbitratorPhase {
        match self.state.active_trigger {
            None => ArbitratorPhase::Idle,
            Some(_) => ArbitratorPhase::Overriding {
                pending_start: self.state.pending_start_ticks > 0,
            },
        }
    }

    #[inline]
    pub fn is_overriding(&self) -> bool {
        self.state.active_trigger.is_some()
    }

    /// Lock-free veto view for hooks that may run while this arbitrator is borrowed.
    #[inline]
    pub fn gate(&self) -> Arc<VetoGate> {
        self.gate.clone()
    }

    /// Lifecycle events produced since the last drain.
    #[inline]
    pub fn drain_events(&mut self) -> Vec<BossMusicEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Per-tick update. `listener` is `None` while no world is loaded; such ticks only
    /// advance fade envelopes.
    pub fn tick(&mut self, listener: Option<&Listener>) {
        self.channels.advance();

        let Some(listener) = listener else {
            return;
        };

        self.mute_suppressed();

        if self.state.active_trigger.is_some() && self.state.pending_start_ticks > 0 {
            self.state.pending_start_ticks -= 1;
            if self.state.pending_start_ticks == 0 {
                self.cut_over();
            }
        }

        self.state.scan_cooldown = self.state.scan_cooldown.saturating_sub(1);
        if self.state.scan_cooldown > 0 {
            return;
        }
        self.state.scan_cooldown = self.scan_interval;

        match self.scanner.find_nearby_trigger(listener, self.radius) {
            None => {
                if self.state.active_trigger.is_some() {
                    log::info!(target: LOG, "boss left range; ending override");
                    self.end_override();
                }
            }
            Some(found) => {
                if self.state.active_trigger.as_ref() != Some(&found) {
                    log::info!(target: LOG, "boss in range: {found} (starting override)");
                    self.begin_override(found);
                }
            }
        }
    }

    #[inline]
    pub fn check_play_request(&self, request: &PlayRequest) -> PlayVerdict {
        self.gate.check(request)
    }

    #[inline]
    pub fn on_play_sound(&self, event: &mut PlaySoundEvent) -> PlayVerdict {
        self.gate.on_play_sound(event)
    }

    /// Ends any override and silences our track immediately.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.state.current_playback.take() {
            if let Err(e) = self.channels.stop_now(handle) {
                log::warn!(target: LOG, "stopping boss track on shutdown failed: {e}");
            }
        }
        self.state.pending_start_ticks = 0;
        self.gate.set_overriding(false);
        if let Some(trigger) = self.state.active_trigger.take() {
            self.outbox.push(BossMusicEvent::OverrideEnded { trigger });
        }
    }

    fn begin_override(&mut self, trigger: ResourceId) {
        // One boss track at a time: the previous one goes before anything else happens.
        self.release_playback();
        self.state.active_trigger = Some(trigger.clone());
        self.gate.set_overriding(true);

        let external_fade = self.bridge.attempt_fade_out(self.fade_ticks) && self.fade_ticks > 0;
        self.outbox.push(BossMusicEvent::OverrideBegan {
            trigger,
            external_fade,
        });

        if external_fade {
            self.state.pending_start_ticks = self.fade_ticks;
        } else {
            self.state.pending_start_ticks = 0;
            self.cut_over();
        }

        // Close the window in which a theme could start during the transition.
        self.mute_suppressed();
    }

    fn end_override(&mut self) {
        self.release_playback();
        self.state.pending_start_ticks = 0;
        self.gate.set_overriding(false);
        if let Some(trigger) = self.state.active_trigger.take() {
            self.outbox.push(BossMusicEvent::OverrideEnded { trigger });
        }
    }

    /// Hard cutover: silence every music instance, then start the boss track.
    fn cut_over(&mut self) {
        if let Err(e) = self.channels.stop_category(SoundCategory::Music) {
            log::warn!(target: LOG, "stopping music category failed: {e}");
        }
        self.start_track();
    }

    fn start_track(&mut self) {
        let Some(trigger) = self.state.active_trigger.clone() else {
            return;
        };
        let Some(track) = self.triggers.track_for(&trigger).cloned() else {
            log::warn!(target: LOG, "no boss track mapped for boss id {trigger}");
            return;
        };

        if let Some(prev) = self.state.current_playback.take() {
            if let Err(e) = self.channels.stop_now(prev) {
                log::warn!(target: LOG, "stopping previous boss track failed: {e}");
            }
        }

        match self.channels.start(&track) {
            Ok(handle) => {
                log::info!(target: LOG, "boss track {track} started for {trigger}");
                self.state.current_playback = Some(handle);
                self.outbox.push(BossMusicEvent::TrackStarted {
                    trigger,
                    track,
                    handle,
                });
            }
            Err(e) => log::warn!(target: LOG, "starting boss track {track} failed: {e}"),
        }
    }

    /// Fades out our current track, falling back to a hard stop.
    fn release_playback(&mut self) {
        let Some(handle) = self.state.current_playback.take() else {
            return;
        };
        if let Err(e) = self.channels.request_fade_out(handle) {
            log::warn!(target: LOG, "boss track fade-out failed ({e}); stopping now");
            if let Err(e) = self.channels.stop_now(handle) {
                log::warn!(target: LOG, "boss track stop failed: {e}");
            }
        }
    }

    fn mute_suppressed(&mut self) {
        for id in self.gate.suppressed.iter() {
            self.channels.mute_matching(id);
        }
    }
}

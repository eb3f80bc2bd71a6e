use std::any::Any;
use std::sync::Arc;

use bosstrack_audio_api::{HostAudio, PlayRequest, PlaySoundEvent, WorldQuery};
use bosstrack_core::{EngineError, EngineResult, Frame, Module, ModuleCtx};
use parking_lot::Mutex;

use crate::arbitrator::{Arbitrator, ArbitratorPhase, PlayVerdict, VetoGate};
use crate::bridge::ExternalMusicBridge;
use crate::channels::ChannelController;
use crate::config::BossMusicConfig;
use crate::events::BossMusicEvent;
use crate::scanner::EntityScanner;

const MODULE_ID: &str = "boss_music";

/// The session's arbitrator, locked by the tick path. Vetoes go through [`VetoGate`].
pub type SharedArbitrator = Arc<Mutex<Arbitrator>>;

/// Resource published on `init` so host sound hooks living outside the engine
/// loop can consult the veto rules.
///
/// `check` and `on_play_sound` never block on a running tick, so a host may call
/// them from inside its own `play`.
#[derive(Clone)]
pub struct BossMusicHandle {
    arbitrator: SharedArbitrator,
    gate: Arc<VetoGate>,
}

impl BossMusicHandle {
    pub fn new(arbitrator: SharedArbitrator) -> Self {
        let gate = arbitrator.lock().gate();
        Self { arbitrator, gate }
    }

    #[inline]
    pub fn check(&self, request: &PlayRequest) -> PlayVerdict {
        self.gate.check(request)
    }

    #[inline]
    pub fn on_play_sound(&self, event: &mut PlaySoundEvent) -> PlayVerdict {
        self.gate.on_play_sound(event)
    }

    #[inline]
    pub fn is_overriding(&self) -> bool {
        self.gate.is_overriding()
    }

    /// Takes the arbitrator lock; not for use from inside `HostAudio` calls.
    #[inline]
    pub fn phase(&self) -> ArbitratorPhase {
        self.arbitrator.lock().phase()
    }
}

/// Engine module driving boss music from fixed ticks.
///
/// Lifecycle events are published on the bus as `E::from(BossMusicEvent)`.
pub struct BossMusicModule {
    config: BossMusicConfig,
    world: Arc<dyn WorldQuery>,
    audio: Option<Box<dyn HostAudio>>,
    arbitrator: Option<SharedArbitrator>,
    gate: Option<Arc<VetoGate>>,
}

impl BossMusicModule {
    pub fn new(config: BossMusicConfig, world: Arc<dyn WorldQuery>, audio: Box<dyn HostAudio>) -> Self {
        Self {
            config,
            world,
            audio: Some(audio),
            arbitrator: None,
            gate: None,
        }
    }
}

impl<E> Module<E> for BossMusicModule
where
    E: From<BossMusicEvent> + Send + 'static,
{
    fn id(&self) -> &'static str {
        MODULE_ID
    }

    fn init(&mut self, ctx: &mut ModuleCtx<'_, E>) -> EngineResult<()> {
        self.config
            .validate()
            .map_err(|e| EngineError::module(MODULE_ID, e))?;

        let audio = self
            .audio
            .take()
            .ok_or_else(|| EngineError::Other("boss music module initialised twice".into()))?;

        let triggers = Arc::new(self.config.trigger_table());
        let bridge = ExternalMusicBridge::discover(ctx.resources(), &self.config.director);
        let scanner = EntityScanner::new(self.world.clone(), triggers.clone());
        let channels = ChannelController::new(audio, self.config.own_namespace.clone(), self.config.fade_ticks);

        log::info!(
            target: MODULE_ID,
            "boss music ready: namespace '{}', {} trigger(s), {} suppressed id(s), director '{}'",
            self.config.own_namespace,
            triggers.len(),
            self.config.suppressed_events.len() + self.config.suppressed_paths.len(),
            bridge.director_name()
        );

        let arbitrator = Arc::new(Mutex::new(Arbitrator::new(
            &self.config,
            triggers,
            Box::new(scanner),
            Box::new(bridge),
            Box::new(channels),
        )));

        let handle = BossMusicHandle::new(arbitrator.clone());
        self.gate = Some(handle.gate.clone());
        ctx.resources().insert(Arc::new(handle));
        self.arbitrator = Some(arbitrator);
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut ModuleCtx<'_, E>, _frame: &Frame) -> EngineResult<()> {
        let Some(arbitrator) = &self.arbitrator else {
            return Ok(());
        };

        let listener = self.world.listener();
        let events = {
            let mut arb = arbitrator.lock();
            arb.tick(listener.as_ref());
            arb.drain_events()
        };

        for ev in events {
            ctx.publish(ev);
        }
        Ok(())
    }

    fn on_external_event(&mut self, _ctx: &mut ModuleCtx<'_, E>, event: &mut dyn Any) -> EngineResult<()> {
        let (Some(gate), Some(play)) = (&self.gate, event.downcast_mut::<PlaySoundEvent>()) else {
            return Ok(());
        };
        gate.on_play_sound(play);
        Ok(())
    }

    fn shutdown(&mut self, ctx: &mut ModuleCtx<'_, E>) -> EngineResult<()> {
        let Some(arbitrator) = self.arbitrator.take() else {
            return Ok(());
        };
        self.gate = None;

        let events = {
            let mut arb = arbitrator.lock();
            arb.shutdown();
            arb.drain_events()
        };
        for ev in events {
            ctx.publish(ev);
        }

        ctx.resources().remove::<BossMusicHandle>();
        log::info!(target: MODULE_ID, "boss music stopped");
        Ok(())
    }
}

use std::sync::Arc;

use crossbeam_channel::unbounded;
use parking_lot::Mutex;

use bosstrack_audio_api::{
    Aabb, AudioError, EntityId, EntitySnapshot, HostAudio, InstanceId, Listener, PlayRequest,
    PlaySoundEvent, ResourceId, SoundCategory, SoundInstanceDesc, Vec3, WorldQuery,
};
use bosstrack_core::{Bus, Engine, EngineError, EngineResult};
use bosstrack_modules_logging::LoggingModule;
use bosstrack_music::{BossMusicConfig, BossMusicEvent, BossMusicModule};

const CONFIG_PATH: &str = "bosstrack.toml";
const BOSS: EntityId = EntityId(100);

#[derive(Debug, Clone)]
enum SandboxEvent {
    Music(BossMusicEvent),
}

impl From<BossMusicEvent> for SandboxEvent {
    fn from(ev: BossMusicEvent) -> Self {
        Self::Music(ev)
    }
}

/// In-memory sound engine: keeps a list of what would be audible.
#[derive(Default)]
struct MemoryMixer {
    playing: Vec<(InstanceId, ResourceId, SoundCategory, f32)>,
    next: u64,
}

impl MemoryMixer {
    fn spawn(&mut self, sound: ResourceId, category: SoundCategory, volume: f32) -> InstanceId {
        self.next += 1;
        let id = InstanceId(self.next);
        self.playing.push((id, sound, category, volume));
        id
    }

    fn describe_music(&self) -> String {
        let tracks: Vec<String> = self
            .playing
            .iter()
            .filter(|(_, _, c, _)| *c == SoundCategory::Music)
            .map(|(_, s, _, v)| format!("{s}@{v:.2}"))
            .collect();
        if tracks.is_empty() {
            "silence".to_string()
        } else {
            tracks.join(", ")
        }
    }
}

struct MemoryHost(Arc<Mutex<MemoryMixer>>);

impl HostAudio for MemoryHost {
    fn play(&mut self, desc: SoundInstanceDesc) -> Result<InstanceId, AudioError> {
        Ok(self.0.lock().spawn(desc.sound, desc.category, desc.volume))
    }

    fn set_volume(&mut self, instance: InstanceId, volume: f32) -> Result<(), AudioError> {
        let mut mixer = self.0.lock();
        let slot = mixer
            .playing
            .iter_mut()
            .find(|(id, ..)| *id == instance)
            .ok_or(AudioError::UnknownInstance(instance))?;
        slot.3 = volume;
        Ok(())
    }

    fn stop_instance(&mut self, instance: InstanceId) -> Result<(), AudioError> {
        self.0.lock().playing.retain(|(id, ..)| *id != instance);
        Ok(())
    }

    fn stop_by_id_and_category(
        &mut self,
        id: &ResourceId,
        category: SoundCategory,
    ) -> Result<(), AudioError> {
        self.0
            .lock()
            .playing
            .retain(|(_, s, c, _)| !(s == id && *c == category));
        Ok(())
    }

    fn stop_all_in_category(&mut self, category: SoundCategory) -> Result<(), AudioError> {
        self.0.lock().playing.retain(|(_, _, c, _)| *c != category);
        Ok(())
    }
}

/// A player standing at the origin and one boss walking along the x axis.
struct WalkingBoss {
    boss_type: ResourceId,
    boss_x: Mutex<f64>,
}

impl WorldQuery for WalkingBoss {
    fn listener(&self) -> Option<Listener> {
        Some(Listener {
            entity: EntityId(1),
            position: Vec3::ZERO,
        })
    }

    fn entities_within(&self, region: &Aabb, excluding: EntityId) -> Vec<EntitySnapshot> {
        let boss = EntitySnapshot {
            id: BOSS,
            type_id: Some(self.boss_type.clone()),
            position: Vec3::new(*self.boss_x.lock(), 0.0, 0.0),
        };
        if boss.id != excluding && region.contains(boss.position) {
            vec![boss]
        } else {
            Vec::new()
        }
    }
}

/// What the host does every tick: ask hooks before starting its own background music.
fn host_music_tick(engine: &mut Engine<SandboxEvent>, mixer: &Arc<Mutex<MemoryMixer>>) -> EngineResult<()> {
    let vanilla = ResourceId::new("minecraft", "music.game");
    if mixer.lock().playing.iter().any(|(_, s, ..)| *s == vanilla) {
        return Ok(());
    }

    let mut ev = PlaySoundEvent::new(PlayRequest::new(vanilla, SoundCategory::Music));
    engine.dispatch_external_event(&mut ev)?;
    if let Some(req) = ev.sound {
        mixer.lock().spawn(req.sound, req.category, 1.0);
    }
    Ok(())
}

fn main() -> EngineResult<()> {
    let (tx, rx) = unbounded::<SandboxEvent>();
    let bus: Bus<SandboxEvent> = Bus::new(tx, rx);

    let mut engine: Engine<SandboxEvent> = Engine::new(50, bus)?;
    engine.register_module(Box::new(LoggingModule::new()))?;

    let config = BossMusicConfig::load_or_default(CONFIG_PATH).map_err(|e| EngineError::module("sandbox", e))?;
    let boss_type = config
        .triggers
        .first()
        .map(|t| t.entity.clone())
        .ok_or_else(|| EngineError::Config("no boss triggers configured".into()))?;

    let mixer = Arc::new(Mutex::new(MemoryMixer::default()));
    let world = Arc::new(WalkingBoss {
        boss_type,
        boss_x: Mutex::new(60.0),
    });

    engine.register_module(Box::new(BossMusicModule::new(
        config,
        world.clone(),
        Box::new(MemoryHost(mixer.clone())),
    )))?;
    engine.start()?;

    // Boss approaches, lingers, then walks off.
    let path: Vec<f64> = (0..40)
        .map(|i| 60.0 - i as f64 * 2.0)
        .chain(std::iter::repeat(0.0).take(40))
        .chain((0..40).map(|i| i as f64 * 2.0))
        .collect();

    let mut events = Vec::new();
    for (tick, x) in path.into_iter().enumerate() {
        *world.boss_x.lock() = x;
        host_music_tick(&mut engine, &mixer)?;
        engine.run_ticks(1)?;

        engine.bus().drain_into(&mut events);
        for SandboxEvent::Music(ev) in events.drain(..) {
            log::info!(target: "sandbox", "tick {tick}: {ev:?}");
        }
        if tick % 10 == 0 {
            log::info!(target: "sandbox", "tick {tick}: boss at x={x:.0}, music: {}", mixer.lock().describe_music());
        }
    }

    engine.shutdown()?;
    log::info!(target: "sandbox", "after shutdown: {}", mixer.lock().describe_music());
    Ok(())
}

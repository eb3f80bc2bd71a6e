use bitflags::bitflags;

use crate::ids::ResourceId;
use crate::math::Vec3;

/// Mixer channel a sound is routed through.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCategory {
    Master = 0,
    Music = 1,
    Records = 2,
    Weather = 3,
    Blocks = 4,
    Hostile = 5,
    Neutral = 6,
    Players = 7,
    Ambient = 8,
    Voice = 9,
}

impl Default for SoundCategory {
    fn default() -> Self {
        Self::Master
    }
}

impl SoundCategory {
    pub const ALL: [SoundCategory; 10] = [
        SoundCategory::Master,
        SoundCategory::Music,
        SoundCategory::Records,
        SoundCategory::Weather,
        SoundCategory::Blocks,
        SoundCategory::Hostile,
        SoundCategory::Neutral,
        SoundCategory::Players,
        SoundCategory::Ambient,
        SoundCategory::Voice,
    ];
}

bitflags! {
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CategoryMask: u16 {
        const NONE    = 0;

        const MASTER  = 1 << 0;
        const MUSIC   = 1 << 1;
        const RECORDS = 1 << 2;
        const WEATHER = 1 << 3;
        const BLOCKS  = 1 << 4;
        const HOSTILE = 1 << 5;
        const NEUTRAL = 1 << 6;
        const PLAYERS = 1 << 7;
        const AMBIENT = 1 << 8;
        const VOICE   = 1 << 9;

        /// Channels a music track can be smuggled through (music, jukebox, ambient beds).
        const INTRUSIVE = Self::MUSIC.bits() | Self::RECORDS.bits() | Self::AMBIENT.bits();
    }
}

impl From<SoundCategory> for CategoryMask {
    #[inline]
    fn from(c: SoundCategory) -> Self {
        CategoryMask::from_bits_truncate(1 << (c as u16))
    }
}

impl CategoryMask {
    /// Categories in this mask, in declaration order.
    pub fn categories(self) -> impl Iterator<Item = SoundCategory> {
        SoundCategory::ALL
            .into_iter()
            .filter(move |c| self.contains(CategoryMask::from(*c)))
    }
}

/// Everything the host needs to start a sound instance.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundInstanceDesc {
    pub sound: ResourceId,
    pub category: SoundCategory,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
    /// Listener-relative: audible at full strength regardless of listener position.
    pub relative: bool,
    pub position: Vec3,
    pub delay_ticks: u32,
}

impl SoundInstanceDesc {
    /// Looping, positionless music instance starting silent.
    pub fn music_loop(sound: ResourceId) -> Self {
        Self {
            sound,
            category: SoundCategory::Music,
            volume: 0.0,
            pitch: 1.0,
            looping: true,
            relative: true,
            position: Vec3::ZERO,
            delay_ticks: 0,
        }
    }
}

/// A sound the host is about to start.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayRequest {
    pub sound: ResourceId,
    pub category: SoundCategory,
}

impl PlayRequest {
    #[inline]
    pub fn new(sound: ResourceId, category: SoundCategory) -> Self {
        Self { sound, category }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        self.sound.namespace()
    }
}

/// Pre-play hook event dispatched by the host for every sound start.
///
/// Listeners cancel playback by clearing `sound`; the host plays whatever is left.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaySoundEvent {
    pub sound: Option<PlayRequest>,
}

impl PlaySoundEvent {
    #[inline]
    pub fn new(request: PlayRequest) -> Self {
        Self { sound: Some(request) }
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.sound = None;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.sound.is_none()
    }
}

//! Host-facing audio contracts: identifiers, categories, and the traits a game client
//! implements so the boss music layer can drive its sound engine and query its world.

pub mod error;
pub mod ids;
pub mod math;
pub mod music;
pub mod system;
pub mod types;
pub mod world;

pub use error::AudioError;
pub use ids::{EntityId, IdParseError, InstanceId, ResourceId};
pub use math::{Aabb, Vec3};
pub use music::{MusicDirector, MusicFader};
pub use system::HostAudio;
pub use types::{CategoryMask, PlayRequest, PlaySoundEvent, SoundCategory, SoundInstanceDesc};
pub use world::{EntitySnapshot, Listener, WorldQuery};

use crate::ids::{EntityId, ResourceId};
use crate::math::{Aabb, Vec3};

/// The local player (or camera) sounds are heard from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Listener {
    pub entity: EntityId,
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    /// Registry id of the entity type. `None` for types the host cannot name.
    pub type_id: Option<ResourceId>,
    pub position: Vec3,
}

/// Read-only spatial view of the client world.
pub trait WorldQuery: Send + Sync {
    /// `None` while no world is loaded or no local player exists.
    fn listener(&self) -> Option<Listener>;

    /// Entities whose position lies inside `region`, minus `excluding`. Order is host-defined.
    fn entities_within(&self, region: &Aabb, excluding: EntityId) -> Vec<EntitySnapshot>;
}

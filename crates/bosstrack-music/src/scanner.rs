use std::sync::Arc;

use bosstrack_audio_api::{Aabb, Listener, ResourceId, WorldQuery};

use crate::config::TriggerTable;

/// Finds music-triggering entities near the listener.
pub trait ProximityScanner: Send {
    /// First trigger found inside the cube of half-width `radius` around the listener.
    /// Which one wins among several is up to the host's entity order.
    fn find_nearby_trigger(&self, listener: &Listener, radius: f64) -> Option<ResourceId>;
}

pub struct EntityScanner {
    world: Arc<dyn WorldQuery>,
    triggers: Arc<TriggerTable>,
}

impl EntityScanner {
    pub fn new(world: Arc<dyn WorldQuery>, triggers: Arc<TriggerTable>) -> Self {
        Self { world, triggers }
    }
}

impl ProximityScanner for EntityScanner {
    fn find_nearby_trigger(&self, listener: &Listener, radius: f64) -> Option<ResourceId> {
        let region = Aabb::cube(listener.position, radius);
        self.world
            .entities_within(&region, listener.entity)
            .into_iter()
            .filter(|e| e.id != listener.entity)
            .filter_map(|e| e.type_id)
            .find(|id| self.triggers.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BossMusicConfig;
    use bosstrack_audio_api::{EntityId, EntitySnapshot, Vec3};

    struct StaticWorld {
        entities: Vec<EntitySnapshot>,
    }

    impl WorldQuery for StaticWorld {
        fn listener(&self) -> Option<Listener> {
            None
        }

        fn entities_within(&self, region: &Aabb, excluding: EntityId) -> Vec<EntitySnapshot> {
            self.entities
                .iter()
                .filter(|e| e.id != excluding && region.contains(e.position))
                .cloned()
                .collect()
        }
    }

    fn entity(id: u64, ty: Option<&str>, x: f64) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId(id),
            type_id: ty.map(|t| ResourceId::parse(t).unwrap()),
            position: Vec3::new(x, 0.0, 0.0),
        }
    }

    fn scanner(entities: Vec<EntitySnapshot>) -> EntityScanner {
        let table = Arc::new(BossMusicConfig::default().trigger_table());
        EntityScanner::new(Arc::new(StaticWorld { entities }), table)
    }

    fn listener() -> Listener {
        Listener {
            entity: EntityId(1),
            position: Vec3::ZERO,
        }
    }

    #[test]
    fn finds_first_trigger_in_range() {
        let s = scanner(vec![
            entity(2, Some("minecraft:zombie"), 3.0),
            entity(3, None, 4.0),
            entity(4, Some("mowziesmobs:umvuthi"), 5.0),
            entity(5, Some("mowziesmobs:frostmaw"), 6.0),
        ]);
        assert_eq!(
            s.find_nearby_trigger(&listener(), 20.0),
            Some(ResourceId::new("mowziesmobs", "umvuthi"))
        );
    }

    #[test]
    fn ignores_triggers_outside_cube() {
        let s = scanner(vec![entity(2, Some("mowziesmobs:frostmaw"), 20.5)]);
        assert_eq!(s.find_nearby_trigger(&listener(), 20.0), None);
        assert!(s.find_nearby_trigger(&listener(), 21.0).is_some());
    }

    #[test]
    fn listener_itself_never_counts() {
        // A listener whose own type happens to be a trigger (e.g. a morph) is skipped.
        let s = scanner(vec![entity(1, Some("mowziesmobs:frostmaw"), 0.0)]);
        assert_eq!(s.find_nearby_trigger(&listener(), 20.0), None);
    }
}

//! Entity state.

use evomap_core::{EntityId, Position, Role};
use serde::{Deserialize, Serialize};

/// Opaque handle a renderer attaches to an entity. The simulation never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// An actor on the grid: the observer or a creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    pub position: Position,
    pub hp: i32,
    pub visual: VisualHandle,
}

impl Entity {
    pub fn new(id: EntityId, role: Role, position: Position, hp: i32) -> Self {
        Self {
            id,
            role,
            position,
            hp,
            visual: VisualHandle::default(),
        }
    }

    pub fn with_visual(mut self, visual: VisualHandle) -> Self {
        self.visual = visual;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    pub fn move_to(&mut self, new_position: Position) {
        self.position = new_position;
    }

    pub fn spawn_record(&self) -> SpawnRecord {
        SpawnRecord {
            role: self.role,
            position: self.position,
        }
    }
}

/// Where an entity was placed, without its runtime state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub role: Role,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new(EntityId(1), Role::Passive, Position::new(5, 5), 10);
        assert_eq!(entity.role, Role::Passive);
        assert_eq!(entity.position, Position::new(5, 5));
        assert_eq!(entity.visual, VisualHandle(0));
        assert!(entity.is_alive());
    }

    #[test]
    fn test_damage_to_zero_kills() {
        let mut entity = Entity::new(EntityId(1), Role::Passive, Position::new(0, 0), 3);
        entity.take_damage(2);
        assert_eq!(entity.hp, 1);
        assert!(entity.is_alive());

        entity.take_damage(2);
        assert_eq!(entity.hp, -1);
        assert!(!entity.is_alive());
    }

    #[test]
    fn test_visual_handle_passes_through() {
        let mut entity = Entity::new(EntityId(2), Role::Aggressive, Position::new(0, 0), 10)
            .with_visual(VisualHandle(77));
        entity.move_to(Position::new(1, 0));
        entity.take_damage(1);
        assert_eq!(entity.visual, VisualHandle(77));
    }

    #[test]
    fn test_spawn_record_serialization() {
        let entity = Entity::new(EntityId(3), Role::Aggressive, Position::new(4, 2), 10);
        let record = entity.spawn_record();
        let json = serde_json::to_string(&record).unwrap();
        let restored: SpawnRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }
}

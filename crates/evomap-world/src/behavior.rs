//! Creature movement policies.
//!
//! Policies are stateless: every tick a creature's next step is recomputed from
//! the grid and the current creature positions alone.

use crate::entity::Entity;
use crate::grid::WorldGrid;
use evomap_core::{Direction, Role};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Read-only view of the world a creature decides against
pub struct Surroundings<'a> {
    pub grid: &'a WorldGrid,
    pub creatures: &'a [Entity],
    /// Manhattan distance at which aggressive creatures count as a threat
    pub threat_radius: i32,
}

impl Surroundings<'_> {
    /// Whether any aggressive creature is within the threat radius of `me`
    pub fn is_threatened(&self, me: &Entity) -> bool {
        self.creatures.iter().any(|other| {
            other.role == Role::Aggressive
                && other.id != me.id
                && other.position.manhattan_distance(&me.position) <= self.threat_radius
        })
    }
}

pub trait Behavior {
    /// Direction to step this tick, or `None` to stay put
    fn decide_move(
        &self,
        me: &Entity,
        surroundings: &Surroundings<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Option<Direction>;
}

/// Wanders one legal step at random
pub struct Aggressive;

/// Wanders, but runs for walkable water when an aggressive creature is close
pub struct Passive;

impl Behavior for Aggressive {
    fn decide_move(
        &self,
        me: &Entity,
        surroundings: &Surroundings<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Option<Direction> {
        random_legal_step(me, surroundings.grid, rng)
    }
}

impl Behavior for Passive {
    fn decide_move(
        &self,
        me: &Entity,
        surroundings: &Surroundings<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Option<Direction> {
        if surroundings.is_threatened(me) {
            if let Some(direction) = flee_step(me, surroundings.grid, rng) {
                trace!(entity_id = %me.id, ?direction, "Passive creature fleeing to water");
                return Some(direction);
            }
        }
        random_legal_step(me, surroundings.grid, rng)
    }
}

/// Policy for a role. The observer is driven externally and has none.
pub fn behavior_for(role: Role) -> Option<&'static dyn Behavior> {
    match role {
        Role::Observer => None,
        Role::Passive => Some(&Passive),
        Role::Aggressive => Some(&Aggressive),
    }
}

/// Uniformly random direction among those that are not blocked
pub fn random_legal_step(me: &Entity, grid: &WorldGrid, rng: &mut ChaCha8Rng) -> Option<Direction> {
    let legal: Vec<Direction> = Direction::all()
        .into_iter()
        .filter(|direction| !grid.is_blocked(me.position.step(*direction)))
        .collect();

    legal.choose(rng).copied()
}

/// One pass over the four neighbors in shuffled order, taking the first
/// legal flee-target tile
fn flee_step(me: &Entity, grid: &WorldGrid, rng: &mut ChaCha8Rng) -> Option<Direction> {
    let mut directions = Direction::all();
    directions.shuffle(rng);

    directions.into_iter().find(|direction| {
        let target = me.position.step(*direction);
        !grid.is_blocked(target) && grid.tile_at(target).is_flee_target()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use evomap_core::{EntityId, Position};
    use evomap_genome::MapGenome;
    use rand::SeedableRng;

    fn grid(rows: &[&str]) -> WorldGrid {
        WorldGrid::freeze(&MapGenome::from_rows(rows).unwrap())
    }

    fn creature(id: u32, role: Role, x: i32, y: i32) -> Entity {
        Entity::new(EntityId(id), role, Position::new(x, y), 10)
    }

    #[test]
    fn test_boxed_in_creature_stays() {
        let grid = grid(&["000", "020", "000"]);
        let me = creature(0, Role::Aggressive, 1, 1);
        let creatures = [me.clone()];
        let surroundings = Surroundings {
            grid: &grid,
            creatures: &creatures,
            threat_radius: 2,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..20 {
            assert_eq!(Aggressive.decide_move(&me, &surroundings, &mut rng), None);
            assert_eq!(Passive.decide_move(&me, &surroundings, &mut rng), None);
        }
    }

    #[test]
    fn test_random_step_only_picks_legal_directions() {
        // Only east is open
        let grid = grid(&["000", "022", "000"]);
        let me = creature(0, Role::Aggressive, 1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        for _ in 0..20 {
            assert_eq!(random_legal_step(&me, &grid, &mut rng), Some(Direction::East));
        }
    }

    #[test]
    fn test_random_step_at_grid_edge() {
        let grid = grid(&["22"]);
        let me = creature(0, Role::Aggressive, 0, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            assert_eq!(random_legal_step(&me, &grid, &mut rng), Some(Direction::East));
        }
    }

    #[test]
    fn test_threatened_passive_flees_to_water() {
        // Water to the west, grass elsewhere
        let grid = grid(&["222", "422", "222"]);
        let me = creature(0, Role::Passive, 1, 1);
        let dragon = creature(1, Role::Aggressive, 2, 2);
        let creatures = [me.clone(), dragon];
        let surroundings = Surroundings {
            grid: &grid,
            creatures: &creatures,
            threat_radius: 2,
        };
        assert!(surroundings.is_threatened(&me));

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            assert_eq!(
                Passive.decide_move(&me, &surroundings, &mut rng),
                Some(Direction::West)
            );
        }
    }

    #[test]
    fn test_blocked_river_is_not_a_flee_target() {
        let grid = grid(&["212", "121", "212"]);
        let me = creature(0, Role::Passive, 1, 1);
        let dragon = creature(1, Role::Aggressive, 0, 0);
        let creatures = [me.clone(), dragon];
        let surroundings = Surroundings {
            grid: &grid,
            creatures: &creatures,
            threat_radius: 2,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert_eq!(Passive.decide_move(&me, &surroundings, &mut rng), None);
    }

    #[test]
    fn test_distant_threat_is_ignored() {
        let me = creature(0, Role::Passive, 0, 0);
        let near = creature(1, Role::Aggressive, 1, 1);
        let far = creature(2, Role::Aggressive, 2, 1);
        let grid = grid(&["2222", "2222"]);

        let creatures = [me.clone(), far.clone()];
        let surroundings = Surroundings {
            grid: &grid,
            creatures: &creatures,
            threat_radius: 2,
        };
        assert!(!surroundings.is_threatened(&me));

        let creatures = [me.clone(), near, far];
        let surroundings = Surroundings {
            grid: &grid,
            creatures: &creatures,
            threat_radius: 2,
        };
        assert!(surroundings.is_threatened(&me));
    }

    #[test]
    fn test_passive_creatures_do_not_threaten() {
        let grid = grid(&["22"]);
        let me = creature(0, Role::Passive, 0, 0);
        let other = creature(1, Role::Passive, 1, 0);
        let creatures = [me.clone(), other];
        let surroundings = Surroundings {
            grid: &grid,
            creatures: &creatures,
            threat_radius: 2,
        };
        assert!(!surroundings.is_threatened(&me));
    }

    #[test]
    fn test_behavior_for_role() {
        assert!(behavior_for(Role::Observer).is_none());
        assert!(behavior_for(Role::Passive).is_some());
        assert!(behavior_for(Role::Aggressive).is_some());
    }
}

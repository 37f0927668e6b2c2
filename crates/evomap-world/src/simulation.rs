//! Tick-driven simulation over a frozen grid.

use crate::behavior::{behavior_for, Surroundings};
use crate::entity::{Entity, SpawnRecord};
use crate::grid::WorldGrid;
use crate::window::VisibilityWindow;
use evomap_core::{Direction, EntityId, Error, Position, Result, Role, RunConfig, Tile, WorldConfig};
use evomap_genome::{EvolutionOutcome, MapEvolver};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

/// Whether the simulation can keep going
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldStatus {
    #[default]
    Running,
    /// Observer hit points reached zero; further ticks do nothing
    ObserverDefeated,
}

/// Result of an observer move request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverMove {
    /// False when the target cell was blocked
    pub moved: bool,
    /// Total damage taken from creatures sharing the observer's cell
    pub damage_taken: i32,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub observer: Option<ObserverMove>,
    /// Aggressive-on-passive hits this tick
    pub creature_hits: usize,
    /// Creatures pruned at the end of the tick
    pub removed: Vec<EntityId>,
    pub status: WorldStatus,
}

pub struct SimulationWorld {
    grid: WorldGrid,
    observer: Entity,
    creatures: Vec<Entity>,
    config: WorldConfig,
    rng: ChaCha8Rng,
    tick: u64,
}

impl SimulationWorld {
    /// Place the observer and spawn the configured creatures on walkable cells
    pub fn new(grid: WorldGrid, config: WorldConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let observer_pos = place_observer(&grid, &config, &mut rng)?;
        let observer = Entity::new(EntityId(0), Role::Observer, observer_pos, config.observer_hp);
        let creatures = spawn_creatures(&grid, &config, &mut rng, 1)?;

        info!(
            observer_x = observer_pos.x,
            observer_y = observer_pos.y,
            creatures = creatures.len(),
            "World constructed"
        );

        Ok(Self {
            grid,
            observer,
            creatures,
            config,
            rng,
            tick: 0,
        })
    }

    /// Evolve a map from `config.seed` and build the world on it. The same
    /// generator carries on into spawning and the creature updates.
    pub fn generate(config: &RunConfig) -> Result<(Self, EvolutionOutcome)> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let evolver = MapEvolver::new(config.generator.clone(), config.fitness.clone())?;
        let outcome = evolver.run(&mut rng)?;

        let grid = WorldGrid::freeze(&outcome.best);
        let world = Self::new(grid, config.world.clone(), rng)?;
        Ok((world, outcome))
    }

    /// World with hand-placed entities. Every position must be a walkable cell.
    pub fn with_entities(
        grid: WorldGrid,
        config: WorldConfig,
        rng: ChaCha8Rng,
        observer_position: Position,
        creatures: &[(Role, Position)],
    ) -> Result<Self> {
        grid.validate()?;
        config.validate()?;

        let placements = std::iter::once((Role::Observer, observer_position))
            .chain(creatures.iter().copied());
        for (role, pos) in placements {
            if grid.is_blocked(pos) {
                return Err(Error::Validation(format!(
                    "Cannot place {} on blocked cell {}",
                    role, pos
                )));
            }
        }

        let observer = Entity::new(
            EntityId(0),
            Role::Observer,
            observer_position,
            config.observer_hp,
        );
        let creatures = creatures
            .iter()
            .enumerate()
            .map(|(i, (role, pos))| {
                Entity::new(EntityId(i as u32 + 1), *role, *pos, config.creature_hp)
            })
            .collect();

        Ok(Self {
            grid,
            observer,
            creatures,
            config,
            rng,
            tick: 0,
        })
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn observer(&self) -> &Entity {
        &self.observer
    }

    pub fn creatures(&self) -> &[Entity] {
        &self.creatures
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn status(&self) -> WorldStatus {
        if self.observer.is_alive() {
            WorldStatus::Running
        } else {
            WorldStatus::ObserverDefeated
        }
    }

    /// Tile at world coordinates; void outside the grid
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        self.grid.tile_at(Position::new(x, y))
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.grid.is_blocked(pos)
    }

    /// Step the observer if the target is open, then take damage from every
    /// creature on the observer's cell. Blocked moves are silent no-ops, but
    /// the damage scan still runs.
    pub fn move_observer(&mut self, direction: Direction) -> ObserverMove {
        let target = self.observer.position.step(direction);
        let moved = !self.grid.is_blocked(target);
        if moved {
            self.observer.move_to(target);
        }

        let mut damage_taken = 0;
        for creature in &self.creatures {
            if creature.position != self.observer.position {
                continue;
            }
            let damage = match creature.role {
                Role::Passive => self.config.passive_damage,
                Role::Aggressive => self.config.aggressive_damage,
                Role::Observer => 0,
            };
            damage_taken += damage;
            debug!(
                attacker = %creature.id,
                role = %creature.role,
                damage,
                "Observer attacked"
            );
        }

        if damage_taken > 0 {
            self.observer.take_damage(damage_taken);
            debug!(hp = self.observer.hp, "Observer hit points");
        }

        trace!(
            ?direction,
            moved,
            x = self.observer.position.x,
            y = self.observer.position.y,
            "Observer move"
        );
        ObserverMove {
            moved,
            damage_taken,
        }
    }

    /// Move every creature, resolve creature collisions, prune the dead.
    /// Returns the number of hits and the ids removed.
    pub fn update_creatures(&mut self) -> (usize, Vec<EntityId>) {
        self.move_creatures();
        let hits = self.resolve_creature_combat();
        let removed = self.remove_dead_creatures();
        (hits, removed)
    }

    /// One full tick: optional observer move with its combat, then the
    /// creature update. A defeated world does not advance.
    pub fn tick(&mut self, input: Option<Direction>) -> TickReport {
        if self.status() == WorldStatus::ObserverDefeated {
            return TickReport {
                tick: self.tick,
                status: WorldStatus::ObserverDefeated,
                ..Default::default()
            };
        }

        let observer = input.map(|direction| self.move_observer(direction));
        let (creature_hits, removed) = self.update_creatures();
        self.tick += 1;

        let status = self.status();
        if status == WorldStatus::ObserverDefeated {
            info!(tick = self.tick, "Observer defeated");
        }

        TickReport {
            tick: self.tick,
            observer,
            creature_hits,
            removed,
            status,
        }
    }

    /// View centered on the observer, including the observer itself
    pub fn visible_window(&self) -> VisibilityWindow {
        VisibilityWindow::capture(
            &self.grid,
            self.observer.position,
            self.config.view_radius,
            std::iter::once(&self.observer).chain(self.creatures.iter()),
        )
    }

    /// Current positions of every entity, observer first
    pub fn spawn_records(&self) -> Vec<SpawnRecord> {
        std::iter::once(&self.observer)
            .chain(self.creatures.iter())
            .map(Entity::spawn_record)
            .collect()
    }

    /// Creatures move one after another; each sees the positions of those
    /// that already moved this tick.
    fn move_creatures(&mut self) {
        for i in 0..self.creatures.len() {
            let Some(behavior) = behavior_for(self.creatures[i].role) else {
                continue;
            };

            let surroundings = Surroundings {
                grid: &self.grid,
                creatures: &self.creatures,
                threat_radius: self.config.threat_radius,
            };
            let decision = behavior.decide_move(&self.creatures[i], &surroundings, &mut self.rng);

            if let Some(direction) = decision {
                let target = self.creatures[i].position.step(direction);
                self.creatures[i].move_to(target);
            }
        }
    }

    /// Every unordered pair on the same cell: an aggressive creature hits a passive one
    fn resolve_creature_combat(&mut self) -> usize {
        let mut hits = 0;
        let damage = self.config.aggressive_damage;

        for i in 0..self.creatures.len() {
            for j in (i + 1)..self.creatures.len() {
                if self.creatures[i].position != self.creatures[j].position {
                    continue;
                }

                let victim = match (self.creatures[i].role, self.creatures[j].role) {
                    (Role::Aggressive, Role::Passive) => j,
                    (Role::Passive, Role::Aggressive) => i,
                    _ => continue,
                };

                self.creatures[victim].take_damage(damage);
                hits += 1;
                debug!(
                    victim = %self.creatures[victim].id,
                    hp = self.creatures[victim].hp,
                    tick = self.tick,
                    "Aggressive creature hit passive creature"
                );
            }
        }

        hits
    }

    fn remove_dead_creatures(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self
            .creatures
            .iter()
            .filter(|creature| !creature.is_alive())
            .map(|creature| creature.id)
            .collect();

        if !removed.is_empty() {
            self.creatures.retain(Entity::is_alive);
            for id in &removed {
                debug!(entity_id = %id, tick = self.tick, "Creature died");
            }
        }

        removed
    }
}

/// Center of the grid, or a random walkable cell within the retry budget
#[instrument(skip_all)]
pub fn place_observer(grid: &WorldGrid, config: &WorldConfig, rng: &mut ChaCha8Rng) -> Result<Position> {
    grid.validate()?;
    let center = grid.center();
    if !grid.is_blocked(center) {
        return Ok(center);
    }

    debug!(x = center.x, y = center.y, "Center blocked, searching for observer spawn");
    for _ in 0..config.observer_spawn_attempts {
        let pos = grid.random_position(rng);
        if !grid.is_blocked(pos) {
            return Ok(pos);
        }
    }

    Err(Error::NoWalkableCell {
        role: Role::Observer,
        attempts: config.observer_spawn_attempts,
    })
}

/// Rejection-sample a walkable cell for one creature
pub fn place_creature(
    grid: &WorldGrid,
    role: Role,
    attempts: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Position> {
    grid.validate()?;
    for _ in 0..attempts {
        let pos = grid.random_position(rng);
        if !grid.is_blocked(pos) {
            return Ok(pos);
        }
    }

    Err(Error::NoWalkableCell { role, attempts })
}

/// Passive creatures first, then aggressive ones, ids counting up from `first_id`
pub fn spawn_creatures(
    grid: &WorldGrid,
    config: &WorldConfig,
    rng: &mut ChaCha8Rng,
    first_id: u32,
) -> Result<Vec<Entity>> {
    let roles = std::iter::repeat(Role::Passive)
        .take(config.passive_count)
        .chain(std::iter::repeat(Role::Aggressive).take(config.aggressive_count));

    let mut creatures = Vec::with_capacity(config.passive_count + config.aggressive_count);
    for (offset, role) in roles.enumerate() {
        let pos = place_creature(grid, role, config.creature_spawn_attempts, rng)?;
        let id = EntityId(first_id + offset as u32);
        trace!(entity_id = %id, %role, x = pos.x, y = pos.y, "Creature spawned");
        creatures.push(Entity::new(id, role, pos, config.creature_hp));
    }

    Ok(creatures)
}

use evomap_core::{
    Direction, Error, FitnessConfig, GeneratorConfig, Position, Role, RunConfig, TileKind,
    WorldConfig,
};
use evomap_genome::{FitnessEvaluator, MapGenome};
use evomap_world::{SimulationWorld, WorldGrid, WorldStatus};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn no_creatures() -> WorldConfig {
    WorldConfig {
        passive_count: 0,
        aggressive_count: 0,
        ..Default::default()
    }
}

fn grid(rows: &[&str]) -> WorldGrid {
    WorldGrid::freeze(&MapGenome::from_rows(rows).unwrap())
}

#[test]
fn walled_in_observer_never_moves() {
    let grid = grid(&["00000", "00000", "00200", "00000", "00000"]);
    let mut world =
        SimulationWorld::new(grid, no_creatures(), ChaCha8Rng::seed_from_u64(1)).unwrap();
    assert_eq!(world.observer().position, Position::new(2, 2));

    for step in 0..10 {
        let report = world.tick(Some(Direction::all()[step % 4]));
        let observer = report.observer.unwrap();
        assert!(!observer.moved);
        assert_eq!(observer.damage_taken, 0);
    }

    assert_eq!(world.tick_count(), 10);
    assert_eq!(world.observer().position, Position::new(2, 2));
    assert_eq!(world.observer().hp, 10);
    assert_eq!(world.status(), WorldStatus::Running);
}

#[test]
fn off_grid_moves_are_rejected() {
    let grid = grid(&["22", "22"]);
    let mut world = SimulationWorld::with_entities(
        grid,
        no_creatures(),
        ChaCha8Rng::seed_from_u64(2),
        Position::new(0, 0),
        &[],
    )
    .unwrap();

    for direction in [Direction::North, Direction::West] {
        let before = world.observer().clone();
        let outcome = world.move_observer(direction);
        assert!(!outcome.moved);
        assert_eq!(world.observer(), &before);
    }
}

#[test]
fn adjacent_creatures_fight_only_when_they_meet() {
    let grid = WorldGrid::freeze(&MapGenome::filled(9, 9, TileKind::Grass));

    for seed in 0..100 {
        let mut world = SimulationWorld::with_entities(
            grid.clone(),
            WorldConfig::default(),
            ChaCha8Rng::seed_from_u64(seed),
            Position::new(8, 8),
            &[
                (Role::Aggressive, Position::new(4, 4)),
                (Role::Passive, Position::new(3, 4)),
            ],
        )
        .unwrap();
        world.tick(None);

        let aggressive = &world.creatures()[0];
        let passive = &world.creatures()[1];
        let expected = if aggressive.position == passive.position { 8 } else { 10 };
        assert_eq!(passive.hp, expected, "seed {}", seed);
        assert_eq!(aggressive.hp, 10);
    }
}

#[test]
fn creatures_two_apart_sometimes_collide() {
    let grid = WorldGrid::freeze(&MapGenome::filled(9, 9, TileKind::Grass));
    let mut collisions = 0;

    for seed in 0..200 {
        let mut world = SimulationWorld::with_entities(
            grid.clone(),
            WorldConfig::default(),
            ChaCha8Rng::seed_from_u64(seed),
            Position::new(8, 8),
            &[
                (Role::Aggressive, Position::new(3, 4)),
                (Role::Passive, Position::new(5, 4)),
            ],
        )
        .unwrap();
        let report = world.tick(None);

        let aggressive = &world.creatures()[0];
        let passive = &world.creatures()[1];
        if aggressive.position == passive.position {
            collisions += 1;
            assert_eq!(report.creature_hits, 1);
            assert_eq!(passive.hp, 8);
        } else {
            assert_eq!(report.creature_hits, 0);
            assert_eq!(passive.hp, 10);
        }
    }

    assert!(collisions > 0);
}

#[test]
fn unplaceable_observer_fails_construction() {
    let grid = WorldGrid::freeze(&MapGenome::filled(5, 5, TileKind::Rock));
    let result = SimulationWorld::new(grid, WorldConfig::default(), ChaCha8Rng::seed_from_u64(3));

    match result {
        Err(Error::NoWalkableCell { role, attempts }) => {
            assert_eq!(role, Role::Observer);
            assert_eq!(attempts, 100);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("world built on a map with no walkable cell"),
    }
}

#[test]
fn fixed_seed_reproduces_map_and_run() {
    let config = RunConfig {
        seed: 2024,
        generator: GeneratorConfig {
            population_size: 6,
            generations: 1,
            ..Default::default()
        },
        ..Default::default()
    };

    let run = || {
        let (mut world, outcome) = SimulationWorld::generate(&config).unwrap();
        for step in 0..25 {
            world.tick(Some(Direction::all()[(step * 3) % 4]));
        }
        (outcome.best.to_bytes().unwrap(), outcome.best_fitness.to_bits(), world.spawn_records())
    };

    assert_eq!(run(), run());
}

#[test]
fn evolved_map_ratios_cover_the_grid() {
    let config = RunConfig {
        seed: 77,
        ..Default::default()
    };
    let (world, outcome) = SimulationWorld::generate(&config).unwrap();
    let evaluator = FitnessEvaluator::new(FitnessConfig::default());

    let coverage = evaluator.coverage(&outcome.best);
    assert_eq!(coverage.walkable + coverage.blocked, coverage.total);
    assert!((coverage.walkable_ratio() + coverage.blocked_ratio() - 1.0).abs() < f64::EPSILON);
    assert_eq!(world.grid().walkable_count(), coverage.walkable);
}

#[test]
fn window_follows_observer() {
    let grid = WorldGrid::freeze(&MapGenome::filled(15, 20, TileKind::Grass));
    let mut world = SimulationWorld::with_entities(
        grid,
        WorldConfig::default(),
        ChaCha8Rng::seed_from_u64(4),
        Position::new(0, 0),
        &[(Role::Passive, Position::new(19, 14))],
    )
    .unwrap();

    let window = world.visible_window();
    assert_eq!(window.origin, Position::new(-4, -4));
    assert_eq!(window.tiles().len(), 81);
    assert_eq!(window.entities.len(), 1);
    assert_eq!(window.render_ascii()[4].chars().nth(4), Some('@'));

    world.tick(Some(Direction::East));
    assert_eq!(world.visible_window().origin, Position::new(-3, -4));
}

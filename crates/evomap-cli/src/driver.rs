//! Headless driver loop: feed one input per tick and print the window.

use anyhow::{bail, Result};
use evomap_core::Direction;
use evomap_world::{SimulationWorld, WorldStatus};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use tracing::info;

/// Where the observer's per-tick input comes from
pub enum InputSource {
    /// Pre-parsed moves; `None` entries tick without moving the observer
    Scripted(std::vec::IntoIter<Option<Direction>>),
    /// A uniformly random direction every tick
    Random { rng: ChaCha8Rng, remaining: usize },
}

impl InputSource {
    /// Parse `NSEW` letters, with `.` for a tick without input
    pub fn scripted(moves: &str) -> Result<Self> {
        let mut parsed = Vec::with_capacity(moves.len());
        for letter in moves.chars().filter(|c| !c.is_whitespace()) {
            if letter == '.' {
                parsed.push(None);
                continue;
            }
            match Direction::from_letter(letter) {
                Some(direction) => parsed.push(Some(direction)),
                None => bail!("invalid move '{}', expected one of N, S, E, W or '.'", letter),
            }
        }
        Ok(Self::Scripted(parsed.into_iter()))
    }

    pub fn random(rng: ChaCha8Rng, ticks: usize) -> Self {
        Self::Random {
            rng,
            remaining: ticks,
        }
    }

    /// Next tick's input, or `None` once the input has run out
    fn next_input(&mut self) -> Option<Option<Direction>> {
        match self {
            Self::Scripted(moves) => moves.next(),
            Self::Random { rng, remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                Some(Direction::all().choose(rng).copied())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveSummary {
    pub ticks: u64,
    pub status: WorldStatus,
    pub observer_hp: i32,
    pub creatures_left: usize,
}

/// Tick until the observer is defeated or the input runs out
pub fn drive(world: &mut SimulationWorld, mut input: InputSource, out: &mut impl Write) -> Result<DriveSummary> {
    write_window(world, out)?;

    while world.status() == WorldStatus::Running {
        let Some(direction) = input.next_input() else {
            break;
        };

        let report = world.tick(direction);
        writeln!(
            out,
            "tick {} hp {} creatures {}",
            report.tick,
            world.observer().hp,
            world.creatures().len()
        )?;
        write_window(world, out)?;
    }

    let summary = DriveSummary {
        ticks: world.tick_count(),
        status: world.status(),
        observer_hp: world.observer().hp,
        creatures_left: world.creatures().len(),
    };
    info!(
        ticks = summary.ticks,
        status = ?summary.status,
        observer_hp = summary.observer_hp,
        creatures_left = summary.creatures_left,
        "Simulation finished"
    );
    Ok(summary)
}

fn write_window(world: &SimulationWorld, out: &mut impl Write) -> Result<()> {
    for row in world.visible_window().render_ascii() {
        writeln!(out, "{}", row)?;
    }
    writeln!(out)?;
    Ok(())
}

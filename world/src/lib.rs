#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Nightwatch.

pub mod circuit;
pub mod collision;
pub mod floorplan;

use std::time::Duration;

use nightwatch_core::{
    Command, Event, FloorplanError, NightwatchConfig, Rect, Vec2, WaypointIndex,
};
use tracing::debug;

pub use circuit::PatrolCircuit;
pub use collision::{CollisionGrid, Sweep};
pub use floorplan::{build_walls, Floorplan};

/// Upper-left corner where the player appears in the standard layout.
pub const STANDARD_PLAYER_START: Vec2 = Vec2::new(80.0, 80.0);

/// Represents the authoritative Nightwatch world state.
#[derive(Debug)]
pub struct World {
    config: NightwatchConfig,
    floorplan: Floorplan,
    grid: CollisionGrid,
    circuit: PatrolCircuit,
    player: PlayerBody,
    enemy: EnemyBody,
    tick_index: u64,
}

impl World {
    /// Creates a world from an explicit layout.
    ///
    /// The collision grid is rasterised once from the floorplan and the enemy
    /// starts on the first waypoint of the circuit.
    #[must_use]
    pub fn new(
        config: NightwatchConfig,
        floorplan: Floorplan,
        circuit: PatrolCircuit,
        player_start: Vec2,
    ) -> Self {
        let grid = CollisionGrid::rasterize(
            floorplan.walls(),
            config.columns(),
            config.rows(),
            config.tile_size,
        );
        let enemy = EnemyBody {
            position: circuit.waypoint(WaypointIndex::new(0)),
            radius: config.enemy_radius,
        };
        let player = PlayerBody {
            position: player_start,
            velocity: Vec2::ZERO,
            size: Vec2::splat(config.player_size),
        };

        Self {
            config,
            floorplan,
            grid,
            circuit,
            player,
            enemy,
            tick_index: 0,
        }
    }

    /// Creates the standard floorplan, circuit and player start.
    pub fn standard(config: NightwatchConfig) -> Result<Self, FloorplanError> {
        let floorplan = Floorplan::standard(&config)?;
        Ok(Self::new(
            config,
            floorplan,
            PatrolCircuit::standard(),
            STANDARD_PLAYER_START,
        ))
    }

    fn step_player(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let from = self.player.position;
        let displacement = self.player.velocity * dt.as_secs_f32();

        for (index, axis) in Vec2::AXES.into_iter().enumerate() {
            let amount = displacement[index];
            if amount == 0.0 {
                continue;
            }
            let reached = self.travel_limit(&self.player.bounds(), axis, amount);
            self.player.position[index] = reached;
        }

        if self.player.position != from {
            out_events.push(Event::PlayerMoved {
                from,
                to: self.player.position,
            });
        }
    }

    /// Coordinate the body's near edge reaches along `axis` after moving by
    /// `amount`, stopping flush against the first wall face or the world edge.
    fn travel_limit(&self, body: &Rect, axis: Vec2, amount: f32) -> f32 {
        let near = body.min().dot(axis);
        let extent = body.size().dot(axis);
        let swept = body.union(&body.translated(axis * amount));
        let bounds = self.config.world_bounds();
        // A wall already overlapping the body never holds it in place.
        let blockers = self
            .floorplan
            .walls()
            .iter()
            .filter(|wall| !body.intersects(wall) && swept.intersects(wall));

        if amount > 0.0 {
            let stop = blockers
                .map(|wall| wall.min().dot(axis))
                .fold(bounds.max().dot(axis), f32::min);
            (near + amount).min(stop - extent).max(near)
        } else {
            let stop = blockers
                .map(|wall| wall.max().dot(axis))
                .fold(bounds.min().dot(axis), f32::max);
            (near + amount).max(stop).min(near)
        }
    }

    fn step_enemy(&mut self, direction: Vec2, distance: f32, out_events: &mut Vec<Event>) {
        if !(distance > 0.0) {
            return;
        }
        let delta = direction.normalize_or_zero() * distance;
        if delta == Vec2::ZERO {
            return;
        }

        let from = self.enemy.position;
        let sweep = self.grid.sweep(from, delta);
        let mut to = sweep.position;
        if !sweep.is_complete() {
            let rest = delta * (1.0 - sweep.covered);
            for slide in [rest * Vec2::X, rest * Vec2::Y] {
                if slide == Vec2::ZERO {
                    continue;
                }
                let slid = self.grid.sweep(to, slide).position;
                if slid != to {
                    to = slid;
                    break;
                }
            }
        }

        if to == from {
            debug!(x = from.x, y = from.y, "enemy step blocked");
            out_events.push(Event::EnemyBlocked { at: from });
        } else {
            self.enemy.position = to;
            out_events.push(Event::EnemyMoved { from, to });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SteerPlayer { heading } => {
            world.player.velocity = heading.normalize_or_zero() * world.config.player_speed;
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.step_player(dt, out_events);
        }
        Command::MoveEnemy {
            direction,
            distance,
        } => world.step_enemy(direction, distance, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use nightwatch_core::{EnemySnapshot, NightwatchConfig, PlayerSnapshot, Rect};

    use super::{CollisionGrid, PatrolCircuit, World};

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &NightwatchConfig {
        &world.config
    }

    /// Wall rectangles of the floorplan.
    #[must_use]
    pub fn walls(world: &World) -> &[Rect] {
        world.floorplan.walls()
    }

    /// Occupancy grid rasterised from the walls.
    #[must_use]
    pub fn collision_grid(world: &World) -> &CollisionGrid {
        &world.grid
    }

    /// Route patrolled by the enemy.
    #[must_use]
    pub fn patrol_circuit(world: &World) -> &PatrolCircuit {
        &world.circuit
    }

    /// Captures the player's body.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            velocity: world.player.velocity,
            bounds: world.player.bounds(),
        }
    }

    /// Captures the enemy's body.
    #[must_use]
    pub fn enemy(world: &World) -> EnemySnapshot {
        EnemySnapshot {
            position: world.enemy.position,
            radius: world.enemy.radius,
        }
    }

    /// Number of ticks processed since construction.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct PlayerBody {
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
}

impl PlayerBody {
    fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

#[derive(Clone, Debug)]
struct EnemyBody {
    position: Vec2,
    radius: f32,
}

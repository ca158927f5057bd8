#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy AI that walks the patrol circuit and chases the player.

use std::time::Duration;

use nightwatch_core::{
    Command, EnemyMode, EnemySnapshot, Event, NightwatchConfig, PlayerSnapshot, Vec2,
};
use nightwatch_world::{CollisionGrid, PatrolCircuit};
use tracing::debug;

/// Observations that drive a single mode transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeInputs {
    /// Whether the chase signal is raised this tick.
    pub chasing: bool,
    /// Simulated time covered by the tick.
    pub dt: Duration,
    /// Center of the player's bounding box.
    pub player_center: Vec2,
    /// Current center of the enemy.
    pub enemy_position: Vec2,
    /// Grace period before a lost chase reverts to patrol.
    pub timeout: Duration,
}

/// Computes the mode that follows `mode` given this tick's observations.
///
/// A raised signal always (re)starts the chase. Once the signal drops the
/// enemy keeps chasing the last sighting until `lost_for` exceeds the timeout,
/// then resumes the patrol at the nearest waypoint it can walk to in a straight
/// line.
#[must_use]
pub fn transition(
    mode: EnemyMode,
    inputs: &ModeInputs,
    circuit: &PatrolCircuit,
    grid: &CollisionGrid,
) -> EnemyMode {
    if inputs.chasing {
        return EnemyMode::Chase {
            lost_for: Duration::ZERO,
            last_seen: inputs.player_center,
        };
    }

    match mode {
        EnemyMode::Patrol { .. } => mode,
        EnemyMode::Chase {
            lost_for,
            last_seen,
        } => {
            let lost_for = lost_for.saturating_add(inputs.dt);
            if lost_for > inputs.timeout {
                EnemyMode::Patrol {
                    waypoint: circuit.nearest_reachable_index(inputs.enemy_position, grid),
                }
            } else {
                EnemyMode::Chase {
                    lost_for,
                    last_seen,
                }
            }
        }
    }
}

/// Read-only state the patrol system consults each tick.
#[derive(Clone, Copy, Debug)]
pub struct PatrolView<'a> {
    /// Enemy body as reported by the world.
    pub enemy: EnemySnapshot,
    /// Player body as reported by the world.
    pub player: PlayerSnapshot,
    /// Route patrolled by the enemy.
    pub circuit: &'a PatrolCircuit,
    /// Occupancy grid the enemy moves on.
    pub grid: &'a CollisionGrid,
    /// Whether the chase signal is raised this tick.
    pub chasing: bool,
}

/// Pure system that owns the enemy mode and proposes enemy steps.
#[derive(Debug)]
pub struct Patrol {
    mode: EnemyMode,
    speed: f32,
    reach_threshold: f32,
    lost_timeout: Duration,
}

impl Patrol {
    /// Creates a patrol system starting at the first waypoint.
    #[must_use]
    pub fn new(config: &NightwatchConfig) -> Self {
        Self {
            mode: EnemyMode::START,
            speed: config.enemy_speed,
            reach_threshold: config.waypoint_reach_threshold,
            lost_timeout: config.lost_player_timeout(),
        }
    }

    /// Mode currently driving the enemy.
    #[must_use]
    pub const fn mode(&self) -> EnemyMode {
        self.mode
    }

    /// Consumes world events and emits at most one enemy step per call.
    ///
    /// Nothing happens unless `events` contains [`Event::TimeAdvanced`]. Mode
    /// switches are reported through `notices`; the step is pushed to `out`.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: PatrolView<'_>,
        notices: &mut Vec<Event>,
        out: &mut Vec<Command>,
    ) {
        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .reduce(Duration::saturating_add);
        let Some(dt) = dt else {
            return;
        };

        let inputs = ModeInputs {
            chasing: view.chasing,
            dt,
            player_center: view.player.center(),
            enemy_position: view.enemy.position,
            timeout: self.lost_timeout,
        };
        let next = transition(self.mode, &inputs, view.circuit, view.grid);
        if !next.same_variant(&self.mode) {
            debug!(mode = ?next, "enemy mode changed");
            notices.push(Event::EnemyModeChanged { mode: next });
        }
        self.mode = next;

        let target = self.target(&view);
        let offset = target - view.enemy.position;
        let distance = offset.length();
        let step = (self.speed * dt.as_secs_f32()).min(distance);
        if step > 0.0 {
            out.push(Command::MoveEnemy {
                direction: offset / distance,
                distance: step,
            });
        }
    }

    fn target(&mut self, view: &PatrolView<'_>) -> Vec2 {
        match self.mode {
            EnemyMode::Patrol { waypoint } => {
                let mut waypoint = waypoint;
                let position = view.circuit.waypoint(waypoint);
                if view.enemy.position.distance(position) <= self.reach_threshold {
                    waypoint = view.circuit.next_index(waypoint);
                    self.mode = EnemyMode::Patrol { waypoint };
                }
                view.circuit.waypoint(waypoint)
            }
            EnemyMode::Chase { last_seen, .. } => {
                if view.chasing {
                    view.player.center()
                } else {
                    last_seen
                }
            }
        }
    }
}

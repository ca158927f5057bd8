#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nightwatch stealth simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use thiserror::Error;

pub mod config;
pub mod geometry;

pub use config::{ConfigError, NightwatchConfig};
pub use geometry::{Rect, Segment};
pub use glam::Vec2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Points the player's velocity along `heading` at the configured speed.
    ///
    /// A zero heading stops the player.
    SteerPlayer {
        /// Desired direction of travel; normalised by the world.
        heading: Vec2,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a collision-respecting step of the enemy.
    MoveEnemy {
        /// Unit direction of travel.
        direction: Vec2,
        /// Distance to cover measured in world units.
        distance: f32,
    },
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player's body moved.
    PlayerMoved {
        /// Upper-left corner before the move.
        from: Vec2,
        /// Upper-left corner after the move.
        to: Vec2,
    },
    /// Confirms that the enemy moved, possibly sliding along a wall.
    EnemyMoved {
        /// Center before the move.
        from: Vec2,
        /// Center after the move.
        to: Vec2,
    },
    /// Reports that every candidate enemy step ran into a blocked tile.
    EnemyBlocked {
        /// Center where the enemy remained.
        at: Vec2,
    },
    /// Announces that the enemy AI switched modes.
    EnemyModeChanged {
        /// Mode that became active.
        mode: EnemyMode,
    },
    /// Announces that the player stepped into the light and scored.
    ScoreAwarded {
        /// Score after the award.
        score: Score,
    },
}

/// Behavioural mode of the enemy AI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyMode {
    /// Walking the patrol circuit toward the indexed waypoint.
    Patrol {
        /// Waypoint currently targeted.
        waypoint: WaypointIndex,
    },
    /// Pursuing the player.
    Chase {
        /// Time elapsed since the chase signal was last observed true.
        lost_for: Duration,
        /// Player center recorded the last time the chase signal was true.
        last_seen: Vec2,
    },
}

impl EnemyMode {
    /// Mode of an enemy starting its patrol at the first waypoint.
    pub const START: Self = Self::Patrol {
        waypoint: WaypointIndex::new(0),
    };

    /// Reports whether the enemy is pursuing the player.
    #[must_use]
    pub const fn is_chasing(&self) -> bool {
        matches!(self, Self::Chase { .. })
    }

    /// Waypoint targeted while patrolling.
    #[must_use]
    pub const fn waypoint(&self) -> Option<WaypointIndex> {
        match self {
            Self::Patrol { waypoint } => Some(*waypoint),
            Self::Chase { .. } => None,
        }
    }

    /// Reports whether the two modes are the same variant.
    #[must_use]
    pub fn same_variant(&self, other: &EnemyMode) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Position within a patrol circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointIndex(usize);

impl WaypointIndex {
    /// Creates a new waypoint index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Number of times the player has been caught in the light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Score(u32);

impl Score {
    /// Creates a score with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric score.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Score after one more catch.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Location of a single collision-grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Immutable representation of the player's body used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Upper-left corner of the bounding box.
    pub position: Vec2,
    /// Current velocity in units per second.
    pub velocity: Vec2,
    /// Axis-aligned bounding box.
    pub bounds: Rect,
}

impl PlayerSnapshot {
    /// Center of the player's bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }
}

/// Immutable representation of the enemy's body used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Center of the enemy's circular body, also the light source.
    pub position: Vec2,
    /// Radius of the circular body.
    pub radius: f32,
}

impl EnemySnapshot {
    /// Axis-aligned bounding box of the circular body.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let extent = Vec2::splat(self.radius);
        Rect::new(self.position - extent, extent * 2.0)
    }
}

/// Outcome of testing the player against the enemy's light for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightReading {
    /// The player's closest point lies within the light radius.
    pub within_radius: bool,
    /// A wall edge crosses the line between the light and the player.
    pub occluded: bool,
    /// The player is lit: within the radius and not occluded.
    pub in_light: bool,
    /// This tick is a rising edge of `in_light` and the score increased.
    pub scored: bool,
}

/// Reasons a floorplan is rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FloorplanError {
    /// A floorplan needs at least one wall.
    #[error("floorplan must contain at least one wall")]
    Empty,
    /// A wall rectangle has no area.
    #[error("wall {index} has a non-positive width or height")]
    Degenerate {
        /// Position of the offending wall in the input list.
        index: usize,
    },
}

/// Reasons a patrol circuit is rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// A circuit needs at least one waypoint.
    #[error("patrol circuit must contain at least one waypoint")]
    Empty,
}

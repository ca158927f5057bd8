#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Assembles the world and systems into a fixed-order Nightwatch session.

use std::time::Duration;

use nightwatch_core::{
    CircuitError, Command, ConfigError, EnemyMode, Event, FloorplanError, LightReading,
    NightwatchConfig, Rect, Score, Vec2,
};
use nightwatch_system_patrol::{Patrol, PatrolView};
use nightwatch_system_scoring::ScoringMonitor;
use nightwatch_system_visibility::{LightFan, Visibility};
use nightwatch_world::{self as world, query, Floorplan, PatrolCircuit, World};
use thiserror::Error;
use tracing::trace;

/// Width of the standard chase zone in the bottom-right corner.
const CHASE_ZONE_WIDTH: f32 = 200.0;
/// Height of the standard chase zone in the bottom-right corner.
const CHASE_ZONE_HEIGHT: f32 = 150.0;

/// Policy deciding when the enemy is told to chase the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChaseTrigger {
    /// Chase while the player's box overlaps the region.
    Zone {
        /// Region that raises the signal.
        region: Rect,
    },
    /// Chase from the first overlap with the region onwards.
    LatchedZone {
        /// Region that trips the latch.
        region: Rect,
        /// Whether the latch has tripped.
        tripped: bool,
    },
    /// Chase while the player's box overlaps the enemy's bounding box.
    Contact,
    /// Never chase.
    Never,
}

impl ChaseTrigger {
    /// Creates an untripped latched zone.
    #[must_use]
    pub const fn latched_zone(region: Rect) -> Self {
        Self::LatchedZone {
            region,
            tripped: false,
        }
    }

    /// Evaluates the chase signal for this tick.
    pub fn evaluate(&mut self, player: &Rect, enemy: &Rect) -> bool {
        match self {
            Self::Zone { region } => region.intersects(player),
            Self::LatchedZone { region, tripped } => {
                *tripped = *tripped || region.intersects(player);
                *tripped
            }
            Self::Contact => enemy.intersects(player),
            Self::Never => false,
        }
    }

    /// Region associated with the trigger, if any.
    #[must_use]
    pub const fn region(&self) -> Option<Rect> {
        match self {
            Self::Zone { region } | Self::LatchedZone { region, .. } => Some(*region),
            Self::Contact | Self::Never => None,
        }
    }
}

/// Region in the bottom-right corner of the world that provokes a chase.
#[must_use]
pub fn standard_chase_zone(config: &NightwatchConfig) -> Rect {
    Rect::from_xywh(
        config.world_width - CHASE_ZONE_WIDTH,
        config.world_height - CHASE_ZONE_HEIGHT,
        CHASE_ZONE_WIDTH,
        CHASE_ZONE_HEIGHT,
    )
}

/// Reasons a session cannot be assembled.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    /// The wall layout was rejected.
    #[error("invalid floorplan")]
    Floorplan(#[from] FloorplanError),
    /// The patrol route was rejected.
    #[error("invalid patrol circuit")]
    Circuit(#[from] CircuitError),
}

/// Summary of a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Number of ticks processed so far, including this one.
    pub tick: u64,
    /// Score after the tick.
    pub score: Score,
    /// Enemy mode after the tick.
    pub mode: EnemyMode,
    /// Light test performed at the end of the tick.
    pub reading: LightReading,
    /// Whether the chase signal was raised.
    pub chasing: bool,
}

/// Owns the world and every system, and advances them in a fixed order.
#[derive(Debug)]
pub struct Session {
    world: World,
    patrol: Patrol,
    visibility: Visibility,
    scoring: ScoringMonitor,
    trigger: ChaseTrigger,
    light: Vec<Vec2>,
    events: Vec<Event>,
}

impl Session {
    /// Wraps an existing world after validating its configuration.
    pub fn new(world: World, trigger: ChaseTrigger) -> Result<Self, SessionError> {
        let config = query::config(&world);
        config.validate()?;

        Ok(Self {
            patrol: Patrol::new(config),
            visibility: Visibility::new(config),
            scoring: ScoringMonitor::new(config),
            light: Vec::with_capacity(config.ray_count as usize + 2),
            events: Vec::new(),
            trigger,
            world,
        })
    }

    /// Builds the standard floorplan, circuit and chase zone.
    pub fn standard(config: NightwatchConfig) -> Result<Self, SessionError> {
        let zone = standard_chase_zone(&config);
        Self::standard_with_trigger(config, ChaseTrigger::Zone { region: zone })
    }

    /// Builds the standard floorplan and circuit with a custom trigger.
    pub fn standard_with_trigger(
        config: NightwatchConfig,
        trigger: ChaseTrigger,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let world = World::standard(config)?;
        Self::new(world, trigger)
    }

    /// Builds a session over a hand-authored layout.
    pub fn from_layout(
        config: NightwatchConfig,
        walls: Vec<Rect>,
        waypoints: Vec<Vec2>,
        player_start: Vec2,
        trigger: ChaseTrigger,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let floorplan = Floorplan::new(walls)?;
        let circuit = PatrolCircuit::new(waypoints)?;
        Self::new(World::new(config, floorplan, circuit, player_start), trigger)
    }

    /// Advances the simulation by `dt` with the player steering along `heading`.
    pub fn tick(&mut self, heading: Vec2, dt: Duration) -> TickReport {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::SteerPlayer { heading },
            &mut self.events,
        );
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let player = query::player(&self.world);
        let chasing = self
            .trigger
            .evaluate(&player.bounds, &query::enemy(&self.world).bounds());

        let mut commands = Vec::new();
        let mut notices = Vec::new();
        self.patrol.handle(
            &self.events,
            PatrolView {
                enemy: query::enemy(&self.world),
                player,
                circuit: query::patrol_circuit(&self.world),
                grid: query::collision_grid(&self.world),
                chasing,
            },
            &mut notices,
            &mut commands,
        );
        self.events.append(&mut notices);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let enemy = query::enemy(&self.world);
        let walls = query::walls(&self.world);
        self.visibility.cast(enemy.position, walls, &mut self.light);

        let mut awards = Vec::new();
        let reading = self
            .scoring
            .handle(&self.events, enemy.position, &player.bounds, walls, &mut awards)
            .unwrap_or_default();
        self.events.append(&mut awards);

        let report = TickReport {
            tick: query::tick_index(&self.world),
            score: self.scoring.score(),
            mode: self.patrol.mode(),
            reading,
            chasing,
        };
        trace!(
            tick = report.tick,
            score = report.score.get(),
            chasing,
            in_light = reading.in_light,
            "tick complete"
        );
        report
    }

    /// Light fan cast at the end of the last tick.
    #[must_use]
    pub fn light_fan(&self) -> LightFan<'_> {
        LightFan::new(&self.light)
    }

    /// Events produced during the last tick, in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Score accumulated so far.
    #[must_use]
    pub fn score(&self) -> Score {
        self.scoring.score()
    }

    /// Current enemy mode.
    #[must_use]
    pub fn mode(&self) -> EnemyMode {
        self.patrol.mode()
    }

    /// Chase trigger in effect, including any latch state.
    #[must_use]
    pub fn trigger(&self) -> &ChaseTrigger {
        &self.trigger
    }
}

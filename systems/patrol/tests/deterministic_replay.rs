use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use nightwatch_core::{Command, EnemyMode, Event, NightwatchConfig, Vec2};
use nightwatch_system_patrol::{Patrol, PatrolView};
use nightwatch_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_inputs());
    let second = replay(scripted_inputs());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.events.iter().any(|record| record.starts_with("mode")));
}

#[derive(Clone, Copy, Debug)]
struct ScriptedInput {
    heading: Vec2,
    chasing: bool,
}

fn scripted_inputs() -> Vec<ScriptedInput> {
    let mut inputs = Vec::new();
    for step in 0..400_u32 {
        let heading = match (step / 40) % 4 {
            0 => Vec2::X,
            1 => Vec2::Y,
            2 => Vec2::NEG_X,
            _ => Vec2::NEG_Y,
        };
        inputs.push(ScriptedInput {
            heading,
            chasing: (60..90).contains(&step),
        });
    }
    inputs
}

fn replay(inputs: Vec<ScriptedInput>) -> ReplayOutcome {
    let config = NightwatchConfig::default();
    let mut patrol = Patrol::new(&config);
    let mut world = World::standard(config).expect("standard world");
    let mut log = Vec::new();
    let dt = Duration::from_millis(16);

    for input in inputs {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SteerPlayer {
                heading: input.heading,
            },
            &mut events,
        );
        world::apply(&mut world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        let mut notices = Vec::new();
        patrol.handle(
            &events,
            PatrolView {
                enemy: query::enemy(&world),
                player: query::player(&world),
                circuit: query::patrol_circuit(&world),
                grid: query::collision_grid(&world),
                chasing: input.chasing,
            },
            &mut notices,
            &mut commands,
        );
        events.extend(notices);

        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        record_events(&events, &mut log);
    }

    ReplayOutcome {
        enemy: bits(query::enemy(&world).position),
        player: bits(query::player(&world).position),
        mode: describe_mode(patrol.mode()),
        events: log,
    }
}

fn record_events(events: &[Event], log: &mut Vec<String>) {
    for event in events {
        let record = match event {
            Event::TimeAdvanced { dt } => format!("time {}", dt.as_micros()),
            Event::PlayerMoved { to, .. } => format!("player {:?}", bits(*to)),
            Event::EnemyMoved { to, .. } => format!("enemy {:?}", bits(*to)),
            Event::EnemyBlocked { at } => format!("blocked {:?}", bits(*at)),
            Event::EnemyModeChanged { mode } => format!("mode {}", describe_mode(*mode)),
            Event::ScoreAwarded { score } => format!("score {}", score.get()),
        };
        log.push(record);
    }
}

fn describe_mode(mode: EnemyMode) -> String {
    match mode {
        EnemyMode::Patrol { waypoint } => format!("patrol {}", waypoint.get()),
        EnemyMode::Chase {
            lost_for,
            last_seen,
        } => format!("chase {} {:?}", lost_for.as_micros(), bits(last_seen)),
    }
}

fn bits(point: Vec2) -> (u32, u32) {
    (point.x.to_bits(), point.y.to_bits())
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    enemy: (u32, u32),
    player: (u32, u32),
    mode: String,
    events: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

use std::time::Duration;

use nightwatch_core::{CircuitError, EnemyMode, Event, NightwatchConfig, Rect, Score, Vec2};
use nightwatch_system_bootstrap::{ChaseTrigger, Session, SessionError};
use nightwatch_world::query;

const DT: Duration = Duration::from_millis(100);

fn border_walls(config: &NightwatchConfig) -> Vec<Rect> {
    let (width, height, thickness) = (
        config.world_width,
        config.world_height,
        config.wall_thickness,
    );
    vec![
        Rect::from_xywh(0.0, 0.0, width, thickness),
        Rect::from_xywh(0.0, height - thickness, width, thickness),
        Rect::from_xywh(0.0, 0.0, thickness, height),
        Rect::from_xywh(width - thickness, 0.0, thickness, height),
    ]
}

fn open_session(waypoints: Vec<Vec2>, player_start: Vec2, trigger: ChaseTrigger) -> Session {
    let config = NightwatchConfig::default();
    let walls = border_walls(&config);
    Session::from_layout(config, walls, waypoints, player_start, trigger).expect("valid layout")
}

#[test]
fn standard_session_patrols_quietly() {
    let mut session = Session::standard(NightwatchConfig::default()).expect("standard session");

    for _ in 0..300 {
        let report = session.tick(Vec2::ZERO, Duration::from_millis(16));
        assert!(!report.chasing);
        assert!(!report.mode.is_chasing());
    }

    assert_eq!(session.score(), Score::new(0));
    assert_eq!(query::tick_index(session.world()), 300);
    assert_eq!(
        session.light_fan().vertices().len(),
        NightwatchConfig::default().ray_count as usize + 2
    );
    assert_eq!(
        session.light_fan().center(),
        Some(query::enemy(session.world()).position)
    );
}

#[test]
fn leaving_the_zone_ends_the_chase_after_the_grace_period() {
    let mut session = open_session(
        vec![Vec2::new(1200.0, 600.0), Vec2::new(1400.0, 600.0)],
        Vec2::new(200.0, 200.0),
        ChaseTrigger::Zone {
            region: Rect::from_xywh(150.0, 150.0, 100.0, 100.0),
        },
    );

    let first = session.tick(Vec2::ZERO, DT);
    assert!(first.chasing);
    assert!(first.mode.is_chasing());

    let mut mode_changes = Vec::new();
    let mut last = first;
    for _ in 0..40 {
        last = session.tick(Vec2::X, DT);
        mode_changes.extend(session.events().iter().filter_map(|event| match event {
            Event::EnemyModeChanged { mode } => Some(*mode),
            _ => None,
        }));
    }

    assert!(!last.chasing);
    assert!(matches!(last.mode, EnemyMode::Patrol { .. }));
    assert_eq!(mode_changes.len(), 1);
}

#[test]
fn score_counts_each_entry_into_the_light() {
    let mut session = open_session(
        vec![Vec2::new(400.0, 400.0)],
        Vec2::new(400.0, 450.0),
        ChaseTrigger::Never,
    );

    let mut awards = 0;
    let count_awards = |session: &Session| {
        session
            .events()
            .iter()
            .filter(|event| matches!(event, Event::ScoreAwarded { .. }))
            .count()
    };

    let report = session.tick(Vec2::ZERO, DT);
    assert!(report.reading.in_light);
    assert!(report.reading.scored);
    awards += count_awards(&session);

    for _ in 0..10 {
        let report = session.tick(Vec2::Y, DT);
        awards += count_awards(&session);
        assert!(report.score.get() <= 1);
    }
    assert!(!session.tick(Vec2::ZERO, DT).reading.within_radius);

    for _ in 0..10 {
        let _ = session.tick(Vec2::NEG_Y, DT);
        awards += count_awards(&session);
    }

    assert_eq!(session.score(), Score::new(2));
    assert_eq!(awards, 2);
}

#[test]
fn contact_trigger_chases_on_touch() {
    let mut session = open_session(
        vec![Vec2::new(400.0, 400.0)],
        Vec2::new(390.0, 390.0),
        ChaseTrigger::Contact,
    );

    let report = session.tick(Vec2::ZERO, DT);
    assert!(report.chasing);
    assert!(report.mode.is_chasing());
}

#[test]
fn empty_circuit_is_reported() {
    let config = NightwatchConfig::default();
    let walls = border_walls(&config);
    let result = Session::from_layout(config, walls, Vec::new(), Vec2::ONE, ChaseTrigger::Never);
    assert!(matches!(
        result,
        Err(SessionError::Circuit(CircuitError::Empty))
    ));
}

#[test]
fn bodies_stay_out_of_walls_at_low_frame_rates() {
    let config = NightwatchConfig::default();
    let everywhere = config.world_bounds();
    let mut session =
        Session::standard_with_trigger(config, ChaseTrigger::Zone { region: everywhere })
            .expect("standard session");
    let headings = [Vec2::X, Vec2::Y, Vec2::new(1.0, 1.0), Vec2::NEG_X, Vec2::NEG_Y];

    for step in 0..200 {
        let heading = headings[(step / 6) % headings.len()];
        let report = session.tick(heading, Duration::from_millis(500));
        assert!(report.chasing);

        let world = session.world();
        let enemy = query::enemy(world).position;
        assert!(
            !query::collision_grid(world).is_blocked_at(enemy),
            "enemy inside a wall tile at {enemy:?} on tick {step}"
        );
        let player = query::player(world).bounds;
        assert!(
            query::walls(world).iter().all(|wall| !wall.intersects(&player)),
            "player overlaps a wall at {player:?} on tick {step}"
        );
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Nightwatch session headlessly.

mod headless;
mod pilot;

use std::{cell::Cell, fs, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use nightwatch_core::{EnemyMode, NightwatchConfig};
use nightwatch_rendering::{Color, EnemyPresentation, Presentation, RenderingBackend, Scene};
use nightwatch_system_bootstrap::{standard_chase_zone, ChaseTrigger, Session, TickReport};
use nightwatch_world::query;
use tracing_subscriber::EnvFilter;

use crate::{headless::HeadlessBackend, pilot::ScriptedPilot};

/// Command-line arguments accepted by the Nightwatch binary.
#[derive(Debug, Parser)]
#[command(name = "nightwatch", about = "Stealth patrol simulation")]
struct CliArgs {
    /// TOML file overriding the default tunables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Seed driving the scripted player.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Rule that sends the enemy after the player.
    #[arg(long, value_enum, default_value_t = TriggerArg::Zone)]
    trigger: TriggerArg,
}

/// Chase triggers selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TriggerArg {
    /// Chase while the player stands in the bottom-right zone.
    Zone,
    /// Chase forever once the player has entered the bottom-right zone.
    LatchedZone,
    /// Chase while the player touches the enemy.
    Contact,
    /// Patrol only.
    Never,
}

impl TriggerArg {
    fn into_trigger(self, config: &NightwatchConfig) -> ChaseTrigger {
        let region = standard_chase_zone(config);
        match self {
            Self::Zone => ChaseTrigger::Zone { region },
            Self::LatchedZone => ChaseTrigger::latched_zone(region),
            Self::Contact => ChaseTrigger::Contact,
            Self::Never => ChaseTrigger::Never,
        }
    }
}

/// Entry point for the Nightwatch command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_ref())?;
    let trigger = args.trigger.into_trigger(&config);
    let session = Session::standard_with_trigger(config, trigger)
        .context("failed to assemble the standard session")?;

    let scene = initial_scene(&session)?;
    let presentation = Presentation::new("Nightwatch", Color::from_rgb_u8(18, 18, 24), scene);
    let backend = HeadlessBackend::new(args.ticks, args.fps, ScriptedPilot::new(args.seed))?;

    let last_report = Rc::new(Cell::new(None::<TickReport>));
    let sink = Rc::clone(&last_report);
    let mut session = session;
    backend.run(presentation, move |dt, input, scene| {
        let report = session.tick(input.heading, dt);
        populate_scene(&session, report, scene);
        sink.set(Some(report));
    })?;

    match last_report.get() {
        Some(report) => println!(
            "nightwatch: {} ticks, score {}, enemy {}",
            report.tick,
            report.score.get(),
            describe_mode(report.mode)
        ),
        None => println!("nightwatch: no ticks simulated"),
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<NightwatchConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<NightwatchConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => NightwatchConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn initial_scene(session: &Session) -> Result<Scene> {
    let world = session.world();
    let config = query::config(world);
    let enemy = query::enemy(world);
    let mut scene = Scene::new(
        glam::Vec2::new(config.world_width, config.world_height),
        query::walls(world).to_vec(),
        session.trigger().region(),
        query::player(world).bounds,
        EnemyPresentation {
            center: enemy.position,
            radius: enemy.radius,
            chasing: session.mode().is_chasing(),
        },
    )
    .context("failed to build the scene")?;
    scene.set_light(session.light_fan().vertices());
    Ok(scene)
}

fn populate_scene(session: &Session, report: TickReport, scene: &mut Scene) {
    let world = session.world();
    let enemy = query::enemy(world);
    scene.player = query::player(world).bounds;
    scene.enemy = EnemyPresentation {
        center: enemy.position,
        radius: enemy.radius,
        chasing: report.mode.is_chasing(),
    };
    scene.set_light(session.light_fan().vertices());
    scene.score = report.score;
}

fn describe_mode(mode: EnemyMode) -> String {
    match mode {
        EnemyMode::Patrol { waypoint } => format!("patrolling toward waypoint {}", waypoint.get()),
        EnemyMode::Chase { lost_for, .. } if lost_for.is_zero() => "chasing".to_owned(),
        EnemyMode::Chase { lost_for, .. } => {
            format!("searching ({:.1}s since last sighting)", lost_for.as_secs_f32())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_names_match_command_line() {
        let args = CliArgs::try_parse_from(["nightwatch", "--trigger", "latched-zone"])
            .expect("valid arguments");
        assert_eq!(args.trigger, TriggerArg::LatchedZone);
        assert_eq!(args.ticks, 600);
        assert_eq!(args.fps, 60);
    }

    #[test]
    fn latched_trigger_uses_standard_zone() {
        let config = NightwatchConfig::default();
        let trigger = TriggerArg::LatchedZone.into_trigger(&config);
        assert_eq!(trigger.region(), Some(standard_chase_zone(&config)));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let path = PathBuf::from("/definitely/not/here/nightwatch.toml");
        let error = load_config(Some(&path)).expect_err("missing file");
        assert!(error.to_string().contains("failed to read config"));
    }

    #[test]
    fn scene_tracks_session_after_a_tick() {
        let mut session = Session::standard(NightwatchConfig::default()).expect("session");
        let mut scene = initial_scene(&session).expect("scene");
        let report = session.tick(glam::Vec2::X, std::time::Duration::from_millis(100));
        populate_scene(&session, report, &mut scene);

        assert_eq!(scene.player, query::player(session.world()).bounds);
        assert_eq!(scene.light.len(), session.light_fan().vertices().len());
        assert_eq!(scene.score_text(), "Score: 0");
        assert!(describe_mode(report.mode).starts_with("patrolling"));
    }
}

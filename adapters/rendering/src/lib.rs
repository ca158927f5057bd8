#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Nightwatch adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use nightwatch_core::{Rect, Score};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, u8::MAX)
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Translucent warm white used for the enemy's light.
pub const LIGHT_COLOR: Color = Color::from_rgba_u8(255, 255, 200, 100);
/// Colour of wall rectangles.
pub const WALL_COLOR: Color = Color::from_rgb_u8(90, 90, 110);
/// Colour of the chase zone.
pub const ZONE_COLOR: Color = Color::from_rgba_u8(200, 40, 40, 80);
/// Colour of the player's body.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(60, 160, 255);
/// Colour of the enemy while patrolling.
pub const ENEMY_COLOR: Color = Color::from_rgb_u8(230, 70, 60);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Direction the player is steering in; zero when idle.
    pub heading: Vec2,
}

/// Enemy rendered as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Center of the circle in world units.
    pub center: Vec2,
    /// Radius of the circle in world units.
    pub radius: f32,
    /// Whether the enemy is currently chasing, which brightens its fill.
    pub chasing: bool,
}

impl EnemyPresentation {
    /// Fill colour reflecting the enemy's mode.
    #[must_use]
    pub fn color(&self) -> Color {
        if self.chasing {
            ENEMY_COLOR.lighten(0.35)
        } else {
            ENEMY_COLOR
        }
    }
}

/// Scene description combining the floorplan, light and both bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Extent of the world in world units.
    pub world_size: Vec2,
    /// Wall rectangles, drawn in [`WALL_COLOR`].
    pub walls: Vec<Rect>,
    /// Region that provokes a chase, if the trigger has one.
    pub chase_zone: Option<Rect>,
    /// Light fan vertices, apex first, drawn as a triangle fan in [`LIGHT_COLOR`].
    pub light: Vec<Vec2>,
    /// Player's bounding box.
    pub player: Rect,
    /// Enemy's circular body.
    pub enemy: EnemyPresentation,
    /// Score shown in the corner of the screen.
    pub score: Score,
}

impl Scene {
    /// Creates a new scene descriptor, rejecting an empty world.
    pub fn new(
        world_size: Vec2,
        walls: Vec<Rect>,
        chase_zone: Option<Rect>,
        player: Rect,
        enemy: EnemyPresentation,
    ) -> Result<Self, RenderingError> {
        if !(world_size.x > 0.0 && world_size.y > 0.0) {
            return Err(RenderingError::InvalidWorldSize { world_size });
        }

        Ok(Self {
            world_size,
            walls,
            chase_zone,
            light: Vec::new(),
            player,
            enemy,
            score: Score::default(),
        })
    }

    /// Replaces the light fan, reusing the existing allocation.
    pub fn set_light(&mut self, vertices: &[Vec2]) {
        self.light.clear();
        self.light.extend_from_slice(vertices);
    }

    /// Text shown for the current score.
    #[must_use]
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score.get())
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Nightwatch scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The world must cover a positive area to be drawn.
    InvalidWorldSize {
        /// Provided world extent that failed validation.
        world_size: Vec2,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWorldSize { world_size } => {
                write!(
                    f,
                    "world size must be positive (received {} x {})",
                    world_size.x, world_size.y
                )
            }
        }
    }
}

impl Error for RenderingError {}

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Frames a heading is held before a new one is drawn.
const HOLD_RANGE: std::ops::RangeInclusive<u32> = 20..=90;

/// Seeded stand-in for a human player that wanders the map.
#[derive(Debug)]
pub(crate) struct ScriptedPilot {
    rng: ChaCha8Rng,
    heading: Vec2,
    frames_left: u32,
}

impl ScriptedPilot {
    /// Creates a pilot whose choices are fully determined by `seed`.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            heading: Vec2::ZERO,
            frames_left: 0,
        }
    }

    /// Heading to steer along this frame.
    pub(crate) fn next_heading(&mut self) -> Vec2 {
        if self.frames_left == 0 {
            self.heading = self.draw_heading();
            self.frames_left = self.rng.gen_range(HOLD_RANGE);
        }
        self.frames_left -= 1;
        self.heading
    }

    fn draw_heading(&mut self) -> Vec2 {
        // One draw in nine idles; the rest pick a compass direction.
        let octant = self.rng.gen_range(0..9_u8);
        if octant == 8 {
            return Vec2::ZERO;
        }
        let angle = f32::from(octant) * std::f32::consts::FRAC_PI_4;
        Vec2::from_angle(angle)
    }
}

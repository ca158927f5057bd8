#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Occlusion-aware scoring that rewards the enemy for catching the player in its light.

use nightwatch_core::{
    geometry::segment_intersection, Event, LightReading, NightwatchConfig, Rect, Score, Segment,
    Vec2,
};
use tracing::info;

/// Rising-edge detector counting how often the player entered the light.
#[derive(Debug)]
pub struct ScoringMonitor {
    radius: f32,
    score: Score,
    was_in_light: bool,
}

impl ScoringMonitor {
    /// Creates a monitor using the configured light radius.
    #[must_use]
    pub fn new(config: &NightwatchConfig) -> Self {
        Self::with_radius(config.light_radius)
    }

    /// Creates a monitor with an explicit light radius.
    #[must_use]
    pub fn with_radius(radius: f32) -> Self {
        Self {
            radius,
            score: Score::default(),
            was_in_light: false,
        }
    }

    /// Score accumulated so far.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Whether the previous observation found the player lit.
    #[must_use]
    pub const fn was_in_light(&self) -> bool {
        self.was_in_light
    }

    /// Tests the player's box against the light at `center` and updates the score.
    pub fn observe(&mut self, center: Vec2, player: &Rect, walls: &[Rect]) -> LightReading {
        let closest = player.closest_point(center);
        let within_radius = center.distance_squared(closest) <= self.radius * self.radius;
        let occluded = within_radius && is_occluded(center, closest, walls);
        let in_light = within_radius && !occluded;
        let scored = in_light && !self.was_in_light;

        if scored {
            self.score = self.score.incremented();
        }
        self.was_in_light = in_light;

        LightReading {
            within_radius,
            occluded,
            in_light,
            scored,
        }
    }

    /// Observes once per tick found in `events`, pushing an award when the score changes.
    ///
    /// Returns the last reading taken, or `None` when no time advanced.
    pub fn handle(
        &mut self,
        events: &[Event],
        center: Vec2,
        player: &Rect,
        walls: &[Rect],
        out: &mut Vec<Event>,
    ) -> Option<LightReading> {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return None;
        }

        let reading = self.observe(center, player, walls);
        if reading.scored {
            info!(score = self.score.get(), "player caught in the light");
            out.push(Event::ScoreAwarded { score: self.score });
        }
        Some(reading)
    }
}

/// Reports whether any wall edge crosses the open segment between `from` and `to`.
#[must_use]
pub fn is_occluded(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    let sight = Segment::new(from, to);
    walls
        .iter()
        .flat_map(Rect::edges)
        .any(|edge| segment_intersection(sight, edge).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Rect {
        Rect::from_xywh(x, y, 32.0, 32.0)
    }

    #[test]
    fn score_rises_once_per_entry() {
        let mut monitor = ScoringMonitor::with_radius(200.0);
        let player = player_at(50.0, 0.0);

        assert!(monitor.observe(Vec2::ZERO, &player, &[]).scored);
        assert!(!monitor.observe(Vec2::ZERO, &player, &[]).scored);
        assert_eq!(monitor.score(), Score::new(1));
        assert!(monitor.was_in_light());
    }

    #[test]
    fn out_of_radius_is_dark() {
        let mut monitor = ScoringMonitor::with_radius(200.0);
        let reading = monitor.observe(Vec2::ZERO, &player_at(300.0, 0.0), &[]);
        assert_eq!(reading, LightReading::default());
    }

    #[test]
    fn closest_point_decides_the_radius_test() {
        let mut monitor = ScoringMonitor::with_radius(200.0);
        // Left edge of the box lies exactly on the radius.
        let reading = monitor.observe(Vec2::ZERO, &player_at(200.0, -16.0), &[]);
        assert!(reading.within_radius);
    }

    #[test]
    fn wall_between_light_and_player_occludes() {
        let wall = Rect::from_xywh(20.0, -100.0, 10.0, 200.0);
        assert!(is_occluded(Vec2::ZERO, Vec2::new(50.0, 0.0), &[wall]));
        assert!(!is_occluded(Vec2::ZERO, Vec2::new(15.0, 0.0), &[wall]));
    }

    #[test]
    fn handle_ignores_batches_without_time() {
        let mut monitor = ScoringMonitor::with_radius(200.0);
        let mut out = Vec::new();
        let reading = monitor.handle(&[], Vec2::ZERO, &player_at(0.0, 0.0), &[], &mut out);
        assert_eq!(reading, None);
        assert!(out.is_empty());
        assert_eq!(monitor.score(), Score::default());
    }
}

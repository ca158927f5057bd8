//! Authored patrol routes.

use nightwatch_core::{CircuitError, Vec2, WaypointIndex};

use crate::collision::CollisionGrid;

/// Waypoints of the standard route, authored against the standard floorplan.
///
/// Every leg, including the wrap from the last waypoint back to the first, is a
/// straight line through open tiles and door gaps.
const STANDARD_WAYPOINTS: [Vec2; 18] = [
    // Top-right room, heading for its lower door.
    Vec2::new(1420.0, 220.0),
    Vec2::new(1240.0, 220.0),
    Vec2::new(1240.0, 640.0),
    Vec2::new(1240.0, 840.0),
    // Through the corridor door and up the corridor.
    Vec2::new(800.0, 840.0),
    Vec2::new(800.0, 640.0),
    Vec2::new(800.0, 240.0),
    // Into the upper-left room, then down to the lower-left room.
    Vec2::new(360.0, 240.0),
    Vec2::new(360.0, 640.0),
    Vec2::new(360.0, 1080.0),
    Vec2::new(640.0, 1080.0),
    Vec2::new(640.0, 840.0),
    // Back east along the lower doors and around the bottom-right room.
    Vec2::new(1040.0, 840.0),
    Vec2::new(1040.0, 1080.0),
    Vec2::new(1480.0, 1080.0),
    Vec2::new(1480.0, 640.0),
    Vec2::new(1240.0, 640.0),
    Vec2::new(1240.0, 360.0),
];

/// Closed, ordered loop of waypoints. Indices wrap modulo the length.
#[derive(Clone, Debug, PartialEq)]
pub struct PatrolCircuit {
    waypoints: Vec<Vec2>,
}

impl PatrolCircuit {
    /// Wraps the waypoints, rejecting an empty route.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, CircuitError> {
        if waypoints.is_empty() {
            return Err(CircuitError::Empty);
        }
        Ok(Self { waypoints })
    }

    /// Route patrolled in the standard floorplan.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            waypoints: STANDARD_WAYPOINTS.to_vec(),
        }
    }

    /// Number of waypoints in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; empty circuits are rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, wrapping around the loop.
    #[must_use]
    pub fn waypoint(&self, index: WaypointIndex) -> Vec2 {
        self.waypoints[index.get() % self.waypoints.len()]
    }

    /// Index following `index` in the loop.
    #[must_use]
    pub fn next_index(&self, index: WaypointIndex) -> WaypointIndex {
        WaypointIndex::new((index.get() + 1) % self.waypoints.len())
    }

    /// Index of the waypoint closest to `point`; ties go to the lowest index.
    #[must_use]
    pub fn nearest_index(&self, point: Vec2) -> WaypointIndex {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            let distance = waypoint.distance_squared(point);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        WaypointIndex::new(best)
    }

    /// Index of the closest waypoint that a straight walk from `point` reaches
    /// without entering a blocked tile.
    ///
    /// Falls back to [`Self::nearest_index`] when every waypoint is walled off.
    #[must_use]
    pub fn nearest_reachable_index(&self, point: Vec2, grid: &CollisionGrid) -> WaypointIndex {
        let mut best = None;
        let mut best_distance = f32::INFINITY;
        for (index, waypoint) in self.iter() {
            let distance = waypoint.distance_squared(point);
            if distance < best_distance && grid.is_line_clear(point, waypoint) {
                best = Some(index);
                best_distance = distance;
            }
        }
        best.unwrap_or_else(|| self.nearest_index(point))
    }

    /// Waypoints in patrol order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Iterates over the waypoints together with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (WaypointIndex, Vec2)> + '_ {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(index, waypoint)| (WaypointIndex::new(index), *waypoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PatrolCircuit {
        PatrolCircuit::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ])
        .expect("non-empty circuit")
    }

    #[test]
    fn empty_circuit_is_rejected() {
        assert_eq!(PatrolCircuit::new(Vec::new()), Err(CircuitError::Empty));
    }

    #[test]
    fn indices_wrap_around_the_loop() {
        let circuit = square();
        assert_eq!(circuit.next_index(WaypointIndex::new(3)), WaypointIndex::new(0));
        assert_eq!(circuit.waypoint(WaypointIndex::new(5)), Vec2::new(10.0, 0.0));
        let last = circuit.iter().last().expect("non-empty iterator");
        assert_eq!(last, (WaypointIndex::new(3), Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn nearest_index_prefers_lowest_on_ties() {
        let circuit = square();
        assert_eq!(circuit.nearest_index(Vec2::new(5.0, 0.0)), WaypointIndex::new(0));
        assert_eq!(circuit.nearest_index(Vec2::new(9.0, 9.0)), WaypointIndex::new(2));
    }

    #[test]
    fn nearest_reachable_index_skips_waypoints_behind_walls() {
        let circuit = square();
        // Tiles (0, 0) and (0, 1) are blocked, hiding waypoint 0 from (5, 1).
        let wall = nightwatch_core::Rect::from_xywh(0.0, 0.0, 1.0, 8.0);
        let grid = CollisionGrid::rasterize(&[wall], 3, 3, 4.0);
        let point = Vec2::new(5.0, 1.0);

        assert_eq!(circuit.nearest_index(point), WaypointIndex::new(0));
        assert_eq!(
            circuit.nearest_reachable_index(point, &grid),
            WaypointIndex::new(1)
        );
    }

    #[test]
    fn nearest_reachable_index_falls_back_when_everything_is_walled_off() {
        let circuit = square();
        // Waypoint 0 sits in a blocked tile and the others lie off the grid.
        let wall = nightwatch_core::Rect::from_xywh(0.0, 0.0, 4.0, 4.0);
        let grid = CollisionGrid::rasterize(&[wall], 2, 2, 4.0);
        let point = Vec2::new(6.0, 5.0);

        assert_eq!(
            circuit.nearest_reachable_index(point, &grid),
            circuit.nearest_index(point)
        );
        assert_eq!(circuit.nearest_index(point), WaypointIndex::new(1));
    }

    #[test]
    fn standard_circuit_is_non_empty() {
        let circuit = PatrolCircuit::standard();
        assert_eq!(circuit.len(), STANDARD_WAYPOINTS.len());
        assert!(!circuit.is_empty());
    }
}

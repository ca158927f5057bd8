//! Static wall layout of a level.

use nightwatch_core::{FloorplanError, NightwatchConfig, Rect};

/// Immutable set of wall rectangles partitioning the world into rooms.
#[derive(Clone, Debug, PartialEq)]
pub struct Floorplan {
    walls: Vec<Rect>,
}

impl Floorplan {
    /// Validates and wraps the provided walls.
    pub fn new(walls: Vec<Rect>) -> Result<Self, FloorplanError> {
        if walls.is_empty() {
            return Err(FloorplanError::Empty);
        }

        if let Some(index) = walls.iter().position(Rect::is_degenerate) {
            return Err(FloorplanError::Degenerate { index });
        }

        Ok(Self { walls })
    }

    /// Builds the standard three-region floorplan for the configured world.
    pub fn standard(config: &NightwatchConfig) -> Result<Self, FloorplanError> {
        Self::new(build_walls(config))
    }

    /// Wall rectangles in construction order.
    #[must_use]
    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    /// Reports whether any wall overlaps the rectangle.
    #[must_use]
    pub fn blocks(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|wall| wall.intersects(rect))
    }
}

/// Lays out the outer border plus partitions separating a left room, a
/// central corridor and a right area.
///
/// The horizontal partition carries one door per region, the left vertical
/// partition two doors, and the corridor's right side a single door in its
/// lower half.
#[must_use]
pub fn build_walls(config: &NightwatchConfig) -> Vec<Rect> {
    let width = config.world_width;
    let height = config.world_height;
    let tile = config.tile_size;
    let thickness = config.wall_thickness;

    let mut walls = vec![
        Rect::from_xywh(0.0, 0.0, width, thickness),
        Rect::from_xywh(0.0, height - thickness, width, thickness),
        Rect::from_xywh(0.0, 0.0, thickness, height),
        Rect::from_xywh(width - thickness, 0.0, thickness, height),
    ];

    let y_div = tile * 12.0;
    let left_width = tile * 18.0;
    let corridor_width = tile * 4.0;
    let right_width = width - left_width - corridor_width;
    let door = tile * 2.0;

    let door_centers = [
        left_width / 2.0,
        left_width + corridor_width / 2.0,
        left_width + corridor_width + right_width / 2.0,
    ];
    let mut cuts = Vec::with_capacity(door_centers.len() * 2 + 2);
    cuts.push(0.0);
    for center in door_centers {
        cuts.push(center - door / 2.0);
        cuts.push(center + door / 2.0);
    }
    cuts.push(width);
    cuts.sort_by(f32::total_cmp);
    walls.extend(
        cuts.chunks_exact(2)
            .map(|span| Rect::from_xywh(span[0], y_div, span[1] - span[0], thickness)),
    );

    let upper_door = y_div / 2.0;
    let lower_door = y_div + (height - y_div) / 2.0;
    let left_cuts = [
        0.0,
        upper_door - door / 2.0,
        upper_door + door / 2.0,
        lower_door - door / 2.0,
        lower_door + door / 2.0,
        height,
    ];
    walls.extend(
        left_cuts
            .chunks_exact(2)
            .map(|span| Rect::from_xywh(left_width, span[0], thickness, span[1] - span[0])),
    );

    let corridor_edge = left_width + corridor_width;
    let gap_start = y_div + (height - y_div) / 2.0 - tile;
    let gap_end = gap_start + tile * 2.0;
    walls.extend(
        [(0.0, y_div), (y_div, gap_start), (gap_end, height)]
            .into_iter()
            .map(|(top, bottom)| Rect::from_xywh(corridor_edge, top, thickness, bottom - top)),
    );

    walls
}

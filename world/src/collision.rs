//! Rasterised occupancy grid derived from the wall set.

use nightwatch_core::{Rect, TileCoord, Vec2};

/// Dense boolean grid marking tiles that overlap a wall.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionGrid {
    columns: u32,
    rows: u32,
    tile_size: f32,
    cells: Vec<bool>,
}

impl CollisionGrid {
    /// Marks every tile whose square intersects at least one wall.
    #[must_use]
    pub fn rasterize(walls: &[Rect], columns: u32, rows: u32, tile_size: f32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);

        for row in 0..rows {
            for column in 0..columns {
                let cell = Rect::from_xywh(
                    column as f32 * tile_size,
                    row as f32 * tile_size,
                    tile_size,
                    tile_size,
                );
                cells.push(walls.iter().any(|wall| cell.intersects(wall)));
            }
        }

        Self {
            columns,
            rows,
            tile_size,
            cells,
        }
    }

    /// Number of columns and rows in the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Walks from `from` along `delta` and stops at the last open position.
    ///
    /// The walk advances in sub-steps no longer than half a tile on either
    /// axis. A sub-step that changes both column and row also needs the two
    /// tiles beside the shared corner to be open, so diagonal moves never clip
    /// through a blocked corner.
    #[must_use]
    pub fn sweep(&self, from: Vec2, delta: Vec2) -> Sweep {
        let max_step = self.tile_size * 0.5;
        let span = delta.abs().max_element();
        let steps = if max_step > 0.0 {
            (span / max_step).ceil().max(1.0) as u32
        } else {
            1
        };

        let mut position = from;
        for step in 1..=steps {
            let next = from + delta * (step as f32 / steps as f32);
            if !self.is_step_open(position, next) {
                return Sweep {
                    position,
                    covered: (step - 1) as f32 / steps as f32,
                };
            }
            position = next;
        }

        Sweep {
            position,
            covered: 1.0,
        }
    }

    /// Reports whether the straight line between the points crosses only open tiles.
    #[must_use]
    pub fn is_line_clear(&self, from: Vec2, to: Vec2) -> bool {
        self.sweep(from, to - from).is_complete()
    }

    fn is_step_open(&self, from: Vec2, to: Vec2) -> bool {
        let Some(end) = self.tile_of(to) else {
            return false;
        };
        if self.is_blocked(end) {
            return false;
        }
        match self.tile_of(from) {
            Some(start) if start.column() != end.column() && start.row() != end.row() => {
                !self.is_blocked(TileCoord::new(start.column(), end.row()))
                    && !self.is_blocked(TileCoord::new(end.column(), start.row()))
            }
            _ => true,
        }
    }

    /// Reports whether the tile is blocked. Tiles outside the grid are blocked.
    #[must_use]
    pub fn is_blocked(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(true)
    }

    /// Reports whether the tile containing `point` is blocked.
    ///
    /// Points outside the grid are treated as blocked.
    #[must_use]
    pub fn is_blocked_at(&self, point: Vec2) -> bool {
        self.tile_of(point).map_or(true, |tile| self.is_blocked(tile))
    }

    /// Tile containing `point`, if the point lies on the grid.
    #[must_use]
    pub fn tile_of(&self, point: Vec2) -> Option<TileCoord> {
        if !(self.tile_size > 0.0) || !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }

        let column = (point.x / self.tile_size).floor() as u32;
        let row = (point.y / self.tile_size).floor() as u32;
        if column < self.columns && row < self.rows {
            Some(TileCoord::new(column, row))
        } else {
            None
        }
    }

    /// World-space square covered by the tile.
    #[must_use]
    pub fn tile_bounds(&self, tile: TileCoord) -> Rect {
        Rect::from_xywh(
            tile.column() as f32 * self.tile_size,
            tile.row() as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Number of blocked tiles.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|blocked| **blocked).count()
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() < self.columns && tile.row() < self.rows {
            let row = usize::try_from(tile.row()).ok()?;
            let column = usize::try_from(tile.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Outcome of [`CollisionGrid::sweep`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    /// Last open position reached along the walk.
    pub position: Vec2,
    /// Fraction of the requested displacement that was covered, in `0.0..=1.0`.
    pub covered: f32,
}

impl Sweep {
    /// Whether the whole displacement was travelled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.covered >= 1.0
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ray-cast visibility fan emitted by the enemy's light.

use std::f32::consts::TAU;

use nightwatch_core::{
    geometry::ray_segment_intersection, NightwatchConfig, Rect, Segment, Vec2,
};

/// Casts a fixed number of rays around a center and clips them against walls.
#[derive(Debug)]
pub struct Visibility {
    ray_count: u32,
    radius: f32,
    edges: Vec<Segment>,
}

impl Visibility {
    /// Creates a caster with the configured ray count and light radius.
    #[must_use]
    pub fn new(config: &NightwatchConfig) -> Self {
        Self::with_resolution(config.ray_count, config.light_radius)
    }

    /// Creates a caster with an explicit resolution.
    #[must_use]
    pub fn with_resolution(ray_count: u32, radius: f32) -> Self {
        Self {
            ray_count,
            radius,
            edges: Vec::new(),
        }
    }

    /// Number of angular subdivisions of the fan.
    #[must_use]
    pub const fn ray_count(&self) -> u32 {
        self.ray_count
    }

    /// Maximum distance a ray travels.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Clears `out` and fills it with the fan around `center`.
    ///
    /// The first vertex is `center`; it is followed by one rim vertex per ray
    /// for `i` in `0..=ray_count`, so the rim closes on itself. Each rim vertex
    /// is the nearest wall hit along its ray, clamped to the light radius.
    pub fn cast(&mut self, center: Vec2, walls: &[Rect], out: &mut Vec<Vec2>) {
        self.edges.clear();
        self.edges.extend(walls.iter().flat_map(Rect::edges));

        out.clear();
        out.reserve(self.ray_count as usize + 2);
        out.push(center);

        if self.ray_count == 0 {
            return;
        }

        for index in 0..=self.ray_count {
            let angle = TAU * index as f32 / self.ray_count as f32;
            let direction = Vec2::new(angle.cos(), angle.sin());
            let nearest = self
                .edges
                .iter()
                .filter_map(|edge| ray_segment_intersection(center, direction, *edge))
                .fold(self.radius, f32::min);
            out.push(center + direction * nearest);
        }
    }
}

/// Borrowed view over a cast fan, convenient for renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightFan<'a> {
    vertices: &'a [Vec2],
}

impl<'a> LightFan<'a> {
    /// Wraps vertices produced by [`Visibility::cast`].
    #[must_use]
    pub const fn new(vertices: &'a [Vec2]) -> Self {
        Self { vertices }
    }

    /// Light source at the apex of the fan, if any vertex was cast.
    #[must_use]
    pub fn center(&self) -> Option<Vec2> {
        self.vertices.first().copied()
    }

    /// Rim vertices in angular order.
    #[must_use]
    pub fn rim(&self) -> &'a [Vec2] {
        self.vertices.get(1..).unwrap_or(&[])
    }

    /// All vertices, apex first.
    #[must_use]
    pub const fn vertices(&self) -> &'a [Vec2] {
        self.vertices
    }

    /// Triangles of the fan, each as `[apex, rim_i, rim_i+1]`.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + 'a {
        let center = self.center().unwrap_or(Vec2::ZERO);
        self.rim()
            .windows(2)
            .map(move |pair| [center, pair[0], pair[1]])
    }
}

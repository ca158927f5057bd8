//! Tunable constants consumed by the stealth simulation.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Rect;

/// Every tunable recognised by the simulation.
///
/// Missing fields fall back to the values of [`NightwatchConfig::default`], so a
/// configuration file only needs to mention the options it overrides.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NightwatchConfig {
    /// Horizontal world extent measured in world units.
    pub world_width: f32,
    /// Vertical world extent measured in world units.
    pub world_height: f32,
    /// Side length of a collision-grid cell.
    pub tile_size: f32,
    /// Thickness of every wall rectangle in the standard floorplan.
    pub wall_thickness: f32,
    /// Linear speed of the enemy in units per second.
    pub enemy_speed: f32,
    /// Linear speed of the player in units per second.
    pub player_speed: f32,
    /// Distance under which a waypoint counts as reached.
    pub waypoint_reach_threshold: f32,
    /// Grace period in seconds before a lost chase reverts to patrol.
    pub lost_player_timeout_secs: f32,
    /// Maximum visibility and illumination distance.
    pub light_radius: f32,
    /// Angular resolution of the visibility fan.
    pub ray_count: u32,
    /// Side length of the player's square bounding box.
    pub player_size: f32,
    /// Radius of the enemy's circular body.
    pub enemy_radius: f32,
}

impl Default for NightwatchConfig {
    fn default() -> Self {
        Self {
            world_width: 1600.0,
            world_height: 1200.0,
            tile_size: 40.0,
            wall_thickness: 20.0,
            enemy_speed: 120.0,
            player_speed: 200.0,
            waypoint_reach_threshold: 8.0,
            lost_player_timeout_secs: 3.0,
            light_radius: 200.0,
            ray_count: 120,
            player_size: 32.0,
            enemy_radius: 15.0,
        }
    }
}

impl NightwatchConfig {
    /// Checks that every option describes a usable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(ConfigError::InvalidWorldExtent {
                width: self.world_width,
                height: self.world_height,
            });
        }

        if !(self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize {
                tile_size: self.tile_size,
            });
        }

        if self.world_width % self.tile_size != 0.0 || self.world_height % self.tile_size != 0.0 {
            return Err(ConfigError::MisalignedWorld {
                width: self.world_width,
                height: self.world_height,
                tile_size: self.tile_size,
            });
        }

        if self.ray_count == 0 {
            return Err(ConfigError::ZeroRayCount);
        }

        let non_negative = [
            ("wall_thickness", self.wall_thickness),
            ("enemy_speed", self.enemy_speed),
            ("player_speed", self.player_speed),
            ("waypoint_reach_threshold", self.waypoint_reach_threshold),
            ("lost_player_timeout_secs", self.lost_player_timeout_secs),
            ("light_radius", self.light_radius),
            ("player_size", self.player_size),
            ("enemy_radius", self.enemy_radius),
        ];
        for (option, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeValue { option, value });
            }
        }

        Ok(())
    }

    /// Number of collision-grid columns covering the world.
    #[must_use]
    pub fn columns(&self) -> u32 {
        grid_extent(self.world_width, self.tile_size)
    }

    /// Number of collision-grid rows covering the world.
    #[must_use]
    pub fn rows(&self) -> u32 {
        grid_extent(self.world_height, self.tile_size)
    }

    /// Grace period before a lost chase reverts to patrol.
    #[must_use]
    pub fn lost_player_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.lost_player_timeout_secs).unwrap_or(Duration::ZERO)
    }

    /// Rectangle covering the whole world.
    #[must_use]
    pub fn world_bounds(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.world_width, self.world_height)
    }
}

fn grid_extent(length: f32, tile_size: f32) -> u32 {
    if tile_size <= 0.0 || length <= 0.0 {
        return 0;
    }
    (length / tile_size).floor() as u32
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The world must cover a positive area.
    #[error("world extent must be positive (received {width} x {height})")]
    InvalidWorldExtent {
        /// Configured world width.
        width: f32,
        /// Configured world height.
        height: f32,
    },
    /// Tiles must have a positive side length.
    #[error("tile size must be positive (received {tile_size})")]
    InvalidTileSize {
        /// Configured tile size.
        tile_size: f32,
    },
    /// The collision grid must tile the world exactly.
    #[error("world extent {width} x {height} is not a multiple of tile size {tile_size}")]
    MisalignedWorld {
        /// Configured world width.
        width: f32,
        /// Configured world height.
        height: f32,
        /// Configured tile size.
        tile_size: f32,
    },
    /// The visibility fan needs at least one ray.
    #[error("ray count must be at least one")]
    ZeroRayCount,
    /// An option that must be a finite, non-negative number was not.
    #[error("{option} must be finite and non-negative (received {value})")]
    NegativeValue {
        /// Name of the offending option.
        option: &'static str,
        /// Value that failed validation.
        value: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_forty_by_thirty_grid() {
        let config = NightwatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns(), 40);
        assert_eq!(config.rows(), 30);
        assert_eq!(config.lost_player_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn partial_toml_overrides_only_named_options() {
        let config: NightwatchConfig = toml::from_str(
            r#"
            light_radius = 150.0
            ray_count = 64
            "#,
        )
        .expect("valid config");

        assert_eq!(config.light_radius, 150.0);
        assert_eq!(config.ray_count, 64);
        assert_eq!(config.enemy_speed, NightwatchConfig::default().enemy_speed);
    }

    #[test]
    fn unknown_options_are_rejected() {
        let parsed = toml::from_str::<NightwatchConfig>("light_radios = 1.0");
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_ray_count_is_rejected() {
        let config = NightwatchConfig {
            ray_count: 0,
            ..NightwatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRayCount));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let config = NightwatchConfig {
            enemy_speed: -1.0,
            ..NightwatchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeValue {
                option: "enemy_speed",
                value: -1.0,
            })
        );
    }

    #[test]
    fn world_must_be_tile_aligned() {
        let config = NightwatchConfig {
            world_width: 1610.0,
            ..NightwatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MisalignedWorld { .. })
        ));
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let config = NightwatchConfig {
            tile_size: 0.0,
            ..NightwatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTileSize { .. })
        ));
        assert_eq!(config.columns(), 0);
    }
}

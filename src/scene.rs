//! Scene configuration and seeding.
//!
//! A [`SceneConfig`] captures everything the orchestrator sets once at scene
//! construction: world boundary extents, index root extents, index tuning,
//! the detection mode flag, and the random-placement parameters used to
//! populate the initial body set.

use crate::collision::quadtree::QuadtreeConfig;
use crate::collision::AABB;
use crate::error::{Error, Result};
use crate::math::vec2::Vec2;
use crate::objects::body::Body;
use crate::world::sim::World;
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

/// Rectangle extents as they appear in configuration files.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RectConfig {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RectConfig {
    fn to_aabb(self) -> AABB {
        AABB::from_position_size(Vec2::new(self.left, self.top), Vec2::new(self.width, self.height))
    }
}

/// Scene settings. All fields are optional in JSON; missing ones fall back
/// to the defaults (10 objects sized 10-50 moving at 20-50, index on).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// World boundary extents. Must lie inside `index`.
    pub world: RectConfig,
    /// Spatial index root extents.
    pub index: RectConfig,
    /// Number of bodies to place at construction.
    pub num_objects: usize,
    /// Body side lengths are sampled from `[object_size_min, object_size_max)`.
    pub object_size_min: f64,
    pub object_size_max: f64,
    /// Velocity components get a magnitude in `[object_vel_min,
    /// object_vel_max)` and a random sign; an empty range means at rest.
    pub object_vel_min: f64,
    pub object_vel_max: f64,
    /// Index tuning: max values per leaf before splitting.
    pub threshold: usize,
    /// Index tuning: hard depth cap.
    pub max_depth: usize,
    /// Indexed vs. brute-force detection.
    pub use_quadtree: bool,
    /// RNG seed for reproducible scenes; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let defaults = QuadtreeConfig::default();
        SceneConfig {
            world: RectConfig {
                left: 50.0,
                top: 50.0,
                width: 900.0,
                height: 900.0,
            },
            index: RectConfig {
                left: 0.0,
                top: 0.0,
                width: 1000.0,
                height: 1000.0,
            },
            num_objects: 10,
            object_size_min: 10.0,
            object_size_max: 50.0,
            object_vel_min: 20.0,
            object_vel_max: 50.0,
            threshold: defaults.threshold,
            max_depth: defaults.max_depth,
            use_quadtree: true,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Reads a JSON scene configuration.
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let config: SceneConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Checks every orchestrator precondition the runtime relies on.
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err(Error::InvalidConfig(
                "world extents must be positive".to_string(),
            ));
        }
        if self.index.width <= 0.0 || self.index.height <= 0.0 {
            return Err(Error::InvalidConfig(
                "index extents must be positive".to_string(),
            ));
        }
        if !self.index.to_aabb().contains(&self.world.to_aabb()) {
            return Err(Error::InvalidConfig(
                "world boundary must lie inside the index rect".to_string(),
            ));
        }
        if self.object_size_min <= 0.0 || self.object_size_max < self.object_size_min {
            return Err(Error::InvalidConfig(format!(
                "object_size range [{}, {}] is invalid",
                self.object_size_min, self.object_size_max
            )));
        }
        // a body must always fit inside the boundary
        if self.object_size_max >= self.world.width || self.object_size_max >= self.world.height {
            return Err(Error::InvalidConfig(
                "object_size_max must be smaller than the world extents".to_string(),
            ));
        }
        if self.object_vel_min < 0.0 || self.object_vel_max < self.object_vel_min {
            return Err(Error::InvalidConfig(format!(
                "object_vel range [{}, {}] is invalid",
                self.object_vel_min, self.object_vel_max
            )));
        }
        if self.threshold == 0 {
            return Err(Error::InvalidConfig(
                "threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates the settings and builds a populated world. Body mass is the
    /// box area, so bigger boxes are proportionally heavier.
    pub fn build_world(&self) -> Result<World> {
        self.validate()?;

        let mut rng: StdRng = match self.seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let world_rect = self.world.to_aabb();
        let mut world = World::with_config(
            world_rect,
            self.index.to_aabb(),
            QuadtreeConfig {
                threshold: self.threshold,
                max_depth: self.max_depth,
            },
            self.use_quadtree,
        );

        for _ in 0..self.num_objects {
            let size = Vec2::new(
                sample_range(&mut rng, self.object_size_min, self.object_size_max),
                sample_range(&mut rng, self.object_size_min, self.object_size_max),
            );
            let position = Vec2::new(
                sample_range(&mut rng, world_rect.left(), world_rect.right() - size.x),
                sample_range(&mut rng, world_rect.top(), world_rect.bottom() - size.y),
            );
            let mut body = Body::new(position, size, size.x * size.y);
            body.velocity = Vec2::new(
                sample_velocity(&mut rng, self.object_vel_min, self.object_vel_max),
                sample_velocity(&mut rng, self.object_vel_min, self.object_vel_max),
            );
            world.add_body(body);
        }

        tracing::debug!(
            num_objects = self.num_objects,
            seed = ?self.seed,
            use_quadtree = self.use_quadtree,
            "seeded scene"
        );
        Ok(world)
    }
}

fn sample_range(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        max
    }
}

/// A velocity component: magnitude inside the range, random sign. An empty
/// range is a dead zone producing zero.
fn sample_velocity(rng: &mut StdRng, min_speed: f64, max_speed: f64) -> f64 {
    if max_speed <= min_speed {
        return 0.0;
    }
    let magnitude = rng.random_range(min_speed..max_speed);
    if rng.random_bool(0.5) {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_size_range_rejected() {
        let config = SceneConfig {
            object_size_min: 50.0,
            object_size_max: 10.0,
            ..SceneConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("object_size"));
    }

    #[test]
    fn test_world_outside_index_rejected() {
        let config = SceneConfig {
            world: RectConfig {
                left: -10.0,
                top: 0.0,
                width: 500.0,
                height: 500.0,
            },
            ..SceneConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seeded_scenes_are_reproducible() {
        let config = SceneConfig {
            num_objects: 25,
            seed: Some(42),
            ..SceneConfig::default()
        };
        let world_a = config.build_world().unwrap();
        let world_b = config.build_world().unwrap();
        assert_eq!(world_a.bodies.len(), 25);
        for (a, b) in world_a.bodies.iter().zip(world_b.bodies.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_seeded_bodies_are_inside_world_with_area_mass() {
        let config = SceneConfig {
            num_objects: 50,
            seed: Some(7),
            ..SceneConfig::default()
        };
        let boundary = config.world.to_aabb();
        let world = config.build_world().unwrap();
        for body in &world.bodies {
            assert!(boundary.contains(&body.bounding_rect()));
            let size = body.size();
            assert!(size.x >= config.object_size_min && size.x < config.object_size_max);
            assert!(size.y >= config.object_size_min && size.y < config.object_size_max);
            assert_eq!(body.mass, size.x * size.y);
            let speed = body.velocity.x.abs();
            assert!(speed >= config.object_vel_min && speed < config.object_vel_max);
        }
    }

    #[test]
    fn test_from_json_reader_with_partial_fields() {
        let json = r#"{
            "num_objects": 3,
            "use_quadtree": false,
            "seed": 9,
            "world": { "left": 10.0, "top": 10.0, "width": 200.0, "height": 200.0 },
            "index": { "left": 0.0, "top": 0.0, "width": 256.0, "height": 256.0 }
        }"#;
        let config = SceneConfig::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(config.num_objects, 3);
        assert!(!config.use_quadtree);
        assert_eq!(config.seed, Some(9));
        // unspecified fields fall back to the defaults
        assert_eq!(config.threshold, SceneConfig::default().threshold);
        let world = config.build_world().unwrap();
        assert_eq!(world.bodies.len(), 3);
        assert!(!world.use_quadtree());
    }

    #[test]
    fn test_dead_zone_velocity_is_zero() {
        let config = SceneConfig {
            num_objects: 5,
            object_vel_min: 30.0,
            object_vel_max: 30.0,
            seed: Some(1),
            ..SceneConfig::default()
        };
        let world = config.build_world().unwrap();
        for body in &world.bodies {
            assert_eq!(body.velocity, Vec2::ZERO);
        }
    }
}

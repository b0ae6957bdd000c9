//! Quadtree-accelerated 2D AABB physics simulation core.
//!
//! Moves a set of axis-aligned rectangular bodies, detects overlaps among
//! them every simulation step through an adaptive quad-tree rebuilt each
//! frame, and resolves those overlaps with mass-weighted position correction
//! and a one-axis elastic velocity exchange. Rendering, input and camera
//! control are external collaborators: the crate mutates bodies in place and
//! hands back colliding pairs, counters, and debug node rectangles.

pub mod collision;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod scene;
pub mod world;

// Re-export key types for easier use
pub use collision::aabb::AABB;
pub use collision::quadtree::{Locate, Quadtree, QuadtreeConfig};
pub use error::{Error, Result};
pub use math::vec2::Vec2;
pub use objects::body::Body;
pub use scene::SceneConfig;
pub use world::boundary::Boundary;
pub use world::sim::{StepStats, World};

use crate::collision::AABB;
use crate::math::vec2::Vec2;

/// A simulated rectangular body.
///
/// `position` is the top-left corner of the box. The bounding rectangle is
/// cached and must equal `AABB::from_position_size(position, size)` whenever
/// the body is observed; code that writes `position` directly is responsible
/// for calling [`Body::refresh_bounding_rect`] before the body is next read.
/// `size` is fixed for the body's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    size: Vec2,
    bounding_rect: AABB,
}

impl Body {
    /// Creates a body at rest. `mass` must be positive and `size` non-degenerate;
    /// the orchestrator owns that precondition (see the scene validation).
    pub fn new(position: Vec2, size: Vec2, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            size,
            bounding_rect: AABB::from_position_size(position, size),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounding_rect(&self) -> AABB {
        self.bounding_rect
    }

    /// Recomputes the cached bounding rectangle from the current position.
    pub fn refresh_bounding_rect(&mut self) {
        self.bounding_rect = AABB::from_position_size(self.position, self.size);
    }

    /// Moves the body by `distance` and refreshes the cached rectangle.
    pub fn translate(&mut self, distance: Vec2) {
        self.position += distance;
        self.refresh_bounding_rect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_caches_bounding_rect() {
        let body = Body::new(Vec2::new(2.0, 3.0), Vec2::new(4.0, 5.0), 20.0);
        assert_eq!(body.bounding_rect().min, Vec2::new(2.0, 3.0));
        assert_eq!(body.bounding_rect().max, Vec2::new(6.0, 8.0));
        assert_eq!(body.size(), Vec2::new(4.0, 5.0));
        assert_eq!(body.mass, 20.0);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_translate_refreshes_rect() {
        let mut body = Body::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), 4.0);
        body.translate(Vec2::new(1.5, -0.5));
        assert_eq!(body.position, Vec2::new(1.5, -0.5));
        assert_eq!(
            body.bounding_rect(),
            AABB::from_position_size(Vec2::new(1.5, -0.5), Vec2::new(2.0, 2.0))
        );
    }

    #[test]
    fn test_manual_position_write_then_refresh() {
        let mut body = Body::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 1.0);
        body.position = Vec2::new(10.0, 10.0);
        body.refresh_bounding_rect();
        assert_eq!(body.bounding_rect().min, Vec2::new(10.0, 10.0));
        assert_eq!(body.bounding_rect().max, Vec2::new(11.0, 11.0));
    }
}

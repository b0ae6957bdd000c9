use crate::collision::AABB;
use crate::objects::body::Body;

/// A fixed containment rectangle. Bodies exist inside it; any body that
/// leaves is clamped flush with the crossed side and reflected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub rect: AABB,
}

impl Boundary {
    pub fn new(rect: AABB) -> Self {
        Boundary { rect }
    }

    /// Pushes a body back inside the boundary. Each crossed side shifts the
    /// position by exactly the crossing amount on that axis and negates that
    /// axis's velocity; both axes can be corrected in the same call. A body
    /// larger than the boundary on some axis is a configuration
    /// precondition violation, not a runtime case.
    pub fn check_containment(&self, body: &mut Body) {
        let rect = body.bounding_rect();
        if self.rect.contains(&rect) {
            return;
        }
        if rect.left() < self.rect.left() {
            body.position.x += self.rect.left() - rect.left();
            body.velocity.x = -body.velocity.x;
        }
        if rect.right() > self.rect.right() {
            body.position.x += self.rect.right() - rect.right();
            body.velocity.x = -body.velocity.x;
        }
        if rect.top() < self.rect.top() {
            body.position.y += self.rect.top() - rect.top();
            body.velocity.y = -body.velocity.y;
        }
        if rect.bottom() > self.rect.bottom() {
            body.position.y += self.rect.bottom() - rect.bottom();
            body.velocity.y = -body.velocity.y;
        }
        body.refresh_bounding_rect();
    }
}

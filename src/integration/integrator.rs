use crate::objects::body::Body;

/// Integrates a body's position forward in time using explicit Euler.
///
/// Velocities only change through collisions and boundary reflection, so the
/// per-tick update is position-only. The cached bounding rectangle is
/// refreshed so the body satisfies its invariant when the spatial index is
/// rebuilt immediately afterwards.
pub fn integrate(body: &mut Body, dt: f64) {
    // p = p + v*dt
    body.position += body.velocity * dt;
    body.refresh_bounding_rect();
}

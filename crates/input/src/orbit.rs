use crate::action::PointerAction;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

const EPS: f32 = 1e-6;

/// Orbit camera controls with inertia.
///
/// The eye sits on a sphere around `target`. Input accumulates into pending
/// deltas; each [`update`](Self::update) applies `damping_factor` of the
/// pending deltas and keeps the rest for later frames, so motion eases out.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    eye: Vec3,
    target: Vec3,
    /// Pending azimuth change (radians).
    delta_theta: f32,
    /// Pending polar change (radians).
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
    pub fov_degrees: f32,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        Self {
            eye,
            target,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            fov_degrees,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).length()
    }

    /// True while queued motion is still being applied.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > EPS
            || self.delta_phi.abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
    }

    /// Queue an action. `viewport_height` is the surface height in pixels.
    pub fn handle(&mut self, action: PointerAction, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        match action {
            PointerAction::Rotate(d) => {
                self.delta_theta -= TAU * d.x / height * self.rotate_speed;
                self.delta_phi -= TAU * d.y / height * self.rotate_speed;
            }
            PointerAction::Pan(d) => self.pan(d, height),
            // Negative lines dolly in, one 0.95 step per line.
            PointerAction::Zoom(lines) => {
                self.scale *= 0.95_f32.powf(-lines * self.zoom_speed);
            }
            PointerAction::Noop => {}
        }
    }

    fn pan(&mut self, delta: Vec2, height: f32) {
        let offset = self.eye - self.target;
        let target_distance = offset.length() * (self.fov_degrees.to_radians() * 0.5).tan();
        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let dx = 2.0 * delta.x * target_distance / height * self.pan_speed;
        let dy = 2.0 * delta.y * target_distance / height * self.pan_speed;
        self.pan_offset += right * -dx + up * dy;
    }

    /// Apply one damping step. Returns the new eye position.
    pub fn update(&mut self) -> Vec3 {
        let offset = self.eye - self.target;
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        theta += self.delta_theta * self.damping_factor;
        phi += self.delta_phi * self.damping_factor;
        phi = phi.clamp(EPS, std::f32::consts::PI - EPS);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * self.damping_factor;
        self.eye = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        let keep = 1.0 - self.damping_factor;
        self.delta_theta *= keep;
        self.delta_phi *= keep;
        self.pan_offset *= keep;
        self.scale = 1.0;

        self.eye
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OrbitControls {
        OrbitControls::new(Vec3::new(1.0, 1.0, 2.0), Vec3::ZERO, 75.0)
    }

    #[test]
    fn idle_update_keeps_pose() {
        let mut c = controls();
        let start = c.eye();
        for _ in 0..100 {
            c.update();
        }
        assert!((c.eye() - start).length() < 1e-4);
        assert!(!c.is_moving());
    }

    #[test]
    fn rotation_eases_out_and_keeps_radius() {
        let mut c = controls();
        let radius = c.distance();
        c.handle(PointerAction::Rotate(Vec2::new(100.0, 0.0)), 600.0);
        assert!(c.is_moving());

        let first = c.update();
        let step1 = (first - Vec3::new(1.0, 1.0, 2.0)).length();
        let before = c.eye();
        let second = c.update();
        let step2 = (second - before).length();

        assert!(step1 > 0.0);
        assert!(step2 < step1, "damping should shrink each step");
        assert!((c.distance() - radius).abs() < 1e-4);

        for _ in 0..1000 {
            c.update();
        }
        assert!(!c.is_moving());
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut c = controls();
        c.damping_factor = 1.0;
        c.handle(PointerAction::Rotate(Vec2::new(0.0, 10_000.0)), 100.0);
        let eye = c.update();
        let r = c.distance();
        assert!(eye.y <= r);
        assert!(eye.y.is_finite());
    }

    #[test]
    fn zoom_in_shrinks_radius_within_limits() {
        let mut c = controls();
        c.min_distance = 2.0;
        let r0 = c.distance();
        c.handle(PointerAction::Zoom(-1.0), 600.0);
        c.update();
        assert!((c.distance() - (r0 * 0.95).max(2.0)).abs() < 1e-4);

        for _ in 0..100 {
            c.handle(PointerAction::Zoom(-1.0), 600.0);
            c.update();
        }
        assert!((c.distance() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_scales_with_wheel_lines() {
        let mut c = OrbitControls::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, 75.0);
        c.handle(PointerAction::Zoom(-3.0), 600.0);
        c.update();
        assert!((c.distance() - 4.0 * 0.95_f32.powi(3)).abs() < 1e-4);

        c.handle(PointerAction::Zoom(0.5), 600.0);
        c.update();
        let expected = 4.0 * 0.95_f32.powi(3) / 0.95_f32.sqrt();
        assert!((c.distance() - expected).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut c = controls();
        c.damping_factor = 1.0;
        let offset = c.eye() - c.target();
        c.handle(PointerAction::Pan(Vec2::new(30.0, 0.0)), 600.0);
        c.update();
        assert_ne!(c.target(), Vec3::ZERO);
        assert!(((c.eye() - c.target()) - offset).length() < 1e-4);
    }

    #[test]
    fn noop_changes_nothing() {
        let mut c = controls();
        c.handle(PointerAction::Noop, 600.0);
        assert!(!c.is_moving());
    }
}

//! Animated properties as pure functions of elapsed seconds.

use glam::Vec3;

/// Euler rotation shared by every spinning mesh.
pub fn spin(t: f32) -> Vec3 {
    Vec3::new(0.15 * t, 0.1 * t, 0.0)
}

pub fn moving_light_1(t: f32) -> Vec3 {
    Vec3::new(2.0 * (0.5 * t).cos(), t.sin(), 2.0 * (0.5 * t).sin())
}

pub fn moving_light_2(t: f32) -> Vec3 {
    Vec3::new(
        2.5 * (-0.5 * t).cos(),
        (2.0 * t).sin() + (2.5 * t).sin(),
        2.55 * (-0.5 * t).sin(),
    )
}

pub fn moving_light_3(t: f32) -> Vec3 {
    Vec3::new(
        (2.0 + (0.32 * t).sin()) * (0.25 * t).cos(),
        2.0 * (1.5 * t).sin(),
        (3.0 + (0.5 * t).sin()) * (0.25 * t).sin(),
    )
}

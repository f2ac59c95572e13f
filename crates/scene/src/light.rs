use camscene_common::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Light variants supported by the scene.
///
/// Positional kinds take their position from the owning node's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Uniform light from every direction.
    Ambient,
    /// Parallel rays shining from the node position towards `target`.
    Directional { target: Vec3 },
    /// Omni light. `distance == 0` means unlimited range.
    Point { distance: f32, decay: f32 },
    /// Emitting rectangle facing `target`.
    RectArea { width: f32, height: f32, target: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { target: Vec3::ZERO },
            color,
            intensity,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            kind: LightKind::Point { distance, decay },
            color,
            intensity,
        }
    }

    pub fn rect_area(color: Color, intensity: f32, width: f32, height: f32) -> Self {
        Self {
            kind: LightKind::RectArea {
                width,
                height,
                target: Vec3::ZERO,
            },
            color,
            intensity,
        }
    }

    /// Point the light at `target`. No-op for kinds without a direction.
    pub fn look_at(mut self, target: Vec3) -> Self {
        match &mut self.kind {
            LightKind::Directional { target: t } | LightKind::RectArea { target: t, .. } => {
                *t = target;
            }
            LightKind::Ambient | LightKind::Point { .. } => {}
        }
        self
    }

    pub fn is_positional(&self) -> bool {
        !matches!(self.kind, LightKind::Ambient)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            LightKind::Ambient => "ambient",
            LightKind::Directional { .. } => "directional",
            LightKind::Point { .. } => "point",
            LightKind::RectArea { .. } => "rect-area",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_sets_target_on_directional_kinds() {
        let target = Vec3::new(0.0, 1.0, 0.0);
        let l = Light::rect_area(Color::WHITE, 2.0, 1.0, 1.0).look_at(target);
        assert!(matches!(l.kind, LightKind::RectArea { target: t, .. } if t == target));

        let p = Light::point(Color::WHITE, 1.0, 10.0, 2.0).look_at(target);
        assert_eq!(p.kind, LightKind::Point { distance: 10.0, decay: 2.0 });
    }

    #[test]
    fn ambient_is_not_positional() {
        assert!(!Light::ambient(Color::WHITE, 0.5).is_positional());
        assert!(Light::directional(Color::WHITE, 0.3).is_positional());
        assert_eq!(Light::directional(Color::WHITE, 0.3).kind_name(), "directional");
    }
}

use camscene_common::Transform;
use camscene_render::PerspectiveCamera;
use camscene_scene::{Geometry, Material, Scene};
use camscene_tools::DebugPanel;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::{LightsShowcase, OrbitingLights};

/// The video plane a rig attaches once capture resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSpec {
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
}

impl ScreenSpec {
    /// Width over height of the plane as seen, ignoring mirroring.
    pub fn aspect(&self) -> f32 {
        match self.geometry {
            Geometry::Plane { width, height } => width / height,
            _ => 1.0,
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.transform.scale.x < 0.0
    }
}

/// One scene variant: its fixed content, its camera and its motion.
///
/// `populate` runs once on an empty scene and returns the panel bound to the
/// lights it created. `animate` only ever writes transforms.
pub trait SceneVariant: Send {
    fn kind(&self) -> VariantKind;

    fn camera(&self) -> PerspectiveCamera;

    fn populate(&mut self, scene: &mut Scene) -> DebugPanel;

    fn screen(&self) -> ScreenSpec;

    fn animate(&self, scene: &mut Scene, t: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// Spinning primitives over a floor, four light kinds, 16:9 screen.
    Lights,
    /// Mirrored 4:3 screen lit by three orbiting point lights.
    Orbit,
}

impl VariantKind {
    pub const ALL: [VariantKind; 2] = [VariantKind::Lights, VariantKind::Orbit];

    pub fn name(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Orbit => "orbit",
        }
    }

    pub fn rig(self) -> Box<dyn SceneVariant> {
        match self {
            Self::Lights => Box::new(LightsShowcase::new()),
            Self::Orbit => Box::new(OrbitingLights::new()),
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}' (expected 'lights' or 'orbit')")]
pub struct UnknownVariant(pub String);

impl FromStr for VariantKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lights" | "1" => Ok(Self::Lights),
            "orbit" | "2" => Ok(Self::Orbit),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

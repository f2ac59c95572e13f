use camscene_common::ObjectId;
use camscene_scene::Scene;
use serde::Serialize;

/// Errors from panel writes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PanelError {
    #[error("no slider at index {0}")]
    NoSuchBinding(usize),
    #[error("slider '{label}' targets missing light {target:?}")]
    TargetMissing { label: String, target: ObjectId },
    #[error("slider value {0} is not a finite number")]
    NotFinite(f32),
}

/// One slider bound to a light's intensity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderBinding {
    pub label: String,
    pub target: ObjectId,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderBinding {
    pub fn new(label: impl Into<String>, target: ObjectId, min: f32, max: f32, step: f32) -> Self {
        Self {
            label: label.into(),
            target,
            min,
            max,
            step,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Live-editable light intensities.
///
/// Values are read from and written straight to the scene; the panel keeps
/// no copy of its own.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugPanel {
    bindings: Vec<SliderBinding>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, binding: SliderBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn bindings(&self) -> &[SliderBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.label == label)
    }

    fn binding(&self, index: usize) -> Result<&SliderBinding, PanelError> {
        self.bindings
            .get(index)
            .ok_or(PanelError::NoSuchBinding(index))
    }

    /// Current live value of slider `index`.
    pub fn value(&self, scene: &Scene, index: usize) -> Result<f32, PanelError> {
        let binding = self.binding(index)?;
        scene
            .light(binding.target)
            .map(|light| light.intensity)
            .ok_or_else(|| PanelError::TargetMissing {
                label: binding.label.clone(),
                target: binding.target,
            })
    }

    /// Clamp `value` into the slider range and write it to the target light.
    /// Returns the value actually applied.
    pub fn set(&self, scene: &mut Scene, index: usize, value: f32) -> Result<f32, PanelError> {
        if !value.is_finite() {
            return Err(PanelError::NotFinite(value));
        }
        let binding = self.binding(index)?;
        let applied = binding.clamp(value);
        let light = scene
            .light_mut(binding.target)
            .ok_or_else(|| PanelError::TargetMissing {
                label: binding.label.clone(),
                target: binding.target,
            })?;
        light.intensity = applied;
        tracing::debug!(label = %binding.label, value = applied, "slider applied");
        Ok(applied)
    }
}

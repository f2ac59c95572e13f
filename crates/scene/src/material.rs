use camscene_common::Color;
use serde::{Deserialize, Serialize};

/// A handle referencing a material in the scene's [`MaterialStore`].
///
/// Handles are copied freely; several meshes holding the same handle share
/// one material on purpose, so a change made through the handle shows up on
/// all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

/// Texture a material can sample from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureSlot {
    /// The live capture image.
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Lit surface with a roughness/metalness response.
    Standard {
        color: Color,
        roughness: f32,
        metalness: f32,
        map: Option<TextureSlot>,
    },
    /// Ignores lights; shows `color` modulated by the optional map.
    Unlit {
        color: Color,
        map: Option<TextureSlot>,
    },
}

impl Material {
    pub fn standard(roughness: f32) -> Self {
        Self::Standard {
            color: Color::WHITE,
            roughness,
            metalness: 0.0,
            map: None,
        }
    }

    /// Lit surface showing the live capture image.
    pub fn lit_video(roughness: f32) -> Self {
        Self::Standard {
            color: Color::WHITE,
            roughness,
            metalness: 0.0,
            map: Some(TextureSlot::Video),
        }
    }

    /// Unlit surface showing the live capture image.
    pub fn video() -> Self {
        Self::Unlit {
            color: Color::WHITE,
            map: Some(TextureSlot::Video),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Standard { color, .. } | Self::Unlit { color, .. } => *color,
        }
    }

    pub fn map(&self) -> Option<TextureSlot> {
        match self {
            Self::Standard { map, .. } | Self::Unlit { map, .. } => *map,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(1.0)
    }
}

/// Arena of materials, indexed by [`MaterialHandle`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(material);
        handle
    }

    pub fn get(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0 as usize)
    }

    pub fn get_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_dense_indices() {
        let mut store = MaterialStore::new();
        let a = store.add(Material::standard(0.4));
        let b = store.add(Material::video());
        assert_eq!(a, MaterialHandle(0));
        assert_eq!(b, MaterialHandle(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).and_then(|m| m.map()), Some(TextureSlot::Video));
        assert!(store.get(MaterialHandle(7)).is_none());
    }

    #[test]
    fn video_materials_sample_the_video_slot() {
        assert_eq!(Material::video().map(), Some(TextureSlot::Video));
        assert_eq!(Material::lit_video(0.4).map(), Some(TextureSlot::Video));
        assert_eq!(Material::standard(0.4).map(), None);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut store = MaterialStore::new();
        let h = store.add(Material::standard(0.4));
        if let Some(Material::Standard { roughness, .. }) = store.get_mut(h) {
            *roughness = 0.9;
        }
        assert!(matches!(
            store.get(h),
            Some(Material::Standard { roughness, .. }) if *roughness == 0.9
        ));
    }
}

use crate::geometry::Geometry;
use crate::light::Light;
use crate::material::{Material, MaterialHandle, MaterialStore};
use camscene_common::{ObjectId, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Renderable geometry bound to a (possibly shared) material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: MaterialHandle,
}

/// What a scene node holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SceneObject {
    Light(Light),
    Mesh(Mesh),
}

/// A named object with its transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub object: SceneObject,
}

/// The root container of everything drawn in a session.
///
/// Nodes live in a BTreeMap so iteration order is stable across runs even
/// though insertion order carries no meaning. Materials live in an arena
/// owned by the scene and are referenced by handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<ObjectId, SceneNode>,
    materials: MaterialStore,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &BTreeMap<ObjectId, SceneNode> {
        &self.nodes
    }

    pub fn materials(&self) -> &MaterialStore {
        &self.materials
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.add(material)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }

    /// Add a light placed at `position`. Returns its id.
    pub fn add_light(&mut self, name: impl Into<String>, light: Light, position: Vec3) -> ObjectId {
        self.insert(name.into(), Transform::from_position(position), SceneObject::Light(light))
    }

    /// Add a mesh with the given transform. Returns its id.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh, transform: Transform) -> ObjectId {
        self.insert(name.into(), transform, SceneObject::Mesh(mesh))
    }

    fn insert(&mut self, name: String, transform: Transform, object: SceneObject) -> ObjectId {
        let id = ObjectId::new();
        tracing::debug!(id = %id.short(), %name, "object added");
        self.nodes.insert(
            id,
            SceneNode {
                name,
                transform,
                object,
            },
        );
        id
    }

    /// Remove an object. Returns the node if it existed.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id);
        if node.is_some() {
            tracing::debug!(id = %id.short(), "object removed");
        }
        node
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn light(&self, id: ObjectId) -> Option<&Light> {
        match &self.nodes.get(&id)?.object {
            SceneObject::Light(light) => Some(light),
            SceneObject::Mesh(_) => None,
        }
    }

    pub fn light_mut(&mut self, id: ObjectId) -> Option<&mut Light> {
        match &mut self.nodes.get_mut(&id)?.object {
            SceneObject::Light(light) => Some(light),
            SceneObject::Mesh(_) => None,
        }
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        match &self.nodes.get(&id)?.object {
            SceneObject::Mesh(mesh) => Some(mesh),
            SceneObject::Light(_) => None,
        }
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        match &mut self.nodes.get_mut(&id)?.object {
            SceneObject::Mesh(mesh) => Some(mesh),
            SceneObject::Light(_) => None,
        }
    }

    /// Iterate lights with their node transforms.
    pub fn lights(&self) -> impl Iterator<Item = (ObjectId, &SceneNode, &Light)> {
        self.nodes.iter().filter_map(|(id, node)| match &node.object {
            SceneObject::Light(light) => Some((*id, node, light)),
            SceneObject::Mesh(_) => None,
        })
    }

    /// Iterate meshes with their node transforms.
    pub fn meshes(&self) -> impl Iterator<Item = (ObjectId, &SceneNode, &Mesh)> {
        self.nodes.iter().filter_map(|(id, node)| match &node.object {
            SceneObject::Mesh(mesh) => Some((*id, node, mesh)),
            SceneObject::Light(_) => None,
        })
    }

    /// Move an object. Returns false if the id is unknown.
    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform.position = position;
                true
            }
            None => false,
        }
    }

    /// Set an object's Euler rotation. Returns false if the id is unknown.
    pub fn set_rotation(&mut self, id: ObjectId, rotation: Vec3) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform.rotation = rotation;
                true
            }
            None => false,
        }
    }
}

use camscene_common::ObjectId;
use camscene_scene::{Scene, SceneObject};

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the scene for the debug panel and
/// headless output.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        SceneSummary {
            lights: scene.lights().count(),
            meshes: scene.meshes().count(),
            materials: scene.materials().len(),
        }
    }

    /// Describe a single object, if it exists.
    pub fn inspect_object(scene: &Scene, id: ObjectId) -> Option<ObjectInfo> {
        scene.get(id).map(|node| {
            let p = node.transform.position;
            let r = node.transform.rotation;
            let s = node.transform.scale;
            let kind = match &node.object {
                SceneObject::Light(light) => light.kind_name(),
                SceneObject::Mesh(mesh) => mesh.geometry.name(),
            };
            ObjectInfo {
                id,
                name: node.name.clone(),
                kind,
                position: [p.x, p.y, p.z],
                rotation: [r.x, r.y, r.z],
                scale: [s.x, s.y, s.z],
            }
        })
    }

    /// List all object ids in the scene.
    pub fn list_objects(scene: &Scene) -> Vec<ObjectId> {
        scene.nodes().keys().copied().collect()
    }
}

/// Summary of scene contents for the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSummary {
    pub lights: usize,
    pub meshes: usize,
    pub materials: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: lights={} meshes={} materials={}",
            self.lights, self.meshes, self.materials
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub name: String,
    pub kind: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2})",
            self.name,
            self.id.short(),
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
        )
    }
}

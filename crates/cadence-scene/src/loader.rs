//! Scene loading from TOML files

use crate::factory::BehaviourFactory;
use crate::format::SceneFile;
use crate::graph::SceneGraph;
use cadence_core::{CadenceError, Result};
use std::fs;
use std::path::Path;

/// Load a scene from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P, factory: &BehaviourFactory) -> Result<(SceneGraph, SceneFile)> {
    let content = fs::read_to_string(path)?;
    load_scene_string(&content, factory)
}

/// Load a scene from a TOML string
pub fn load_scene_string(content: &str, factory: &BehaviourFactory) -> Result<(SceneGraph, SceneFile)> {
    let scene_file: SceneFile = toml::from_str(content)?;
    let mut scene = SceneGraph::new();

    // First pass: create all objects so parents can be referenced in any order
    for object in &scene_file.objects {
        scene.spawn(object.name.clone())?;
    }

    // Second pass: hierarchy and behaviours
    for object in &scene_file.objects {
        let id = scene
            .get_id(&object.name)
            .ok_or_else(|| CadenceError::ObjectNotFound(object.name.clone()))?;

        if let Some(parent) = &object.parent {
            scene.set_parent_by_name(&object.name, parent).map_err(|e| {
                CadenceError::SceneError(format!("object '{}': {}", object.name, e))
            })?;
        }

        for component in &object.components {
            let behaviour = factory.create(component).map_err(|e| match e {
                CadenceError::UnknownComponent(_) | CadenceError::InvalidComponent { .. } => {
                    CadenceError::SceneError(format!("object '{}': {}", object.name, e))
                }
                other => other,
            })?;
            scene.attach_boxed(id, behaviour)?;
        }
    }

    log::info!(
        "Loaded scene '{}' ({} objects)",
        scene_file.scene.name,
        scene.object_count()
    );
    Ok((scene, scene_file))
}

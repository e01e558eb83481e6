//! CLI command implementations

pub mod inspect;
pub mod run;

use anyhow::{Context, Result};
use cadence_scene::{load_scene, BehaviourFactory, SceneFile, SceneGraph};
use cadence_script::{register_script_factory, ScriptHost};
use std::path::{Path, PathBuf};

/// Builtin behaviours plus the `script` component type
pub fn build_factory(scripts_dir: PathBuf) -> BehaviourFactory {
    let mut factory = BehaviourFactory::with_builtins();
    register_script_factory(&mut factory, ScriptHost::new(), scripts_dir);
    factory
}

/// Scripts live next to the scene unless overridden
pub fn scripts_dir(scene_path: &str, scripts: Option<&str>) -> PathBuf {
    match scripts {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(scene_path)
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("scripts"),
    }
}

pub fn load(scene_path: &str, scripts: Option<&str>) -> Result<(SceneGraph, SceneFile)> {
    let factory = build_factory(scripts_dir(scene_path, scripts));
    load_scene(scene_path, &factory).with_context(|| format!("Failed to load scene {}", scene_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_default_next_to_scene() {
        assert_eq!(
            scripts_dir("levels/demo.toml", None),
            PathBuf::from("levels/scripts")
        );
        assert_eq!(scripts_dir("demo.toml", None), PathBuf::from("scripts"));
        assert_eq!(scripts_dir("demo.toml", Some("lua")), PathBuf::from("lua"));
    }

    #[test]
    fn factory_knows_scripts_and_builtins() {
        let factory = build_factory(PathBuf::from("scripts"));
        assert!(factory.contains("script"));
        assert!(factory.contains("lifetime"));
    }
}

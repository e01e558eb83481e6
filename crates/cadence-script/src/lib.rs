//! Cadence Script - Rhai-scripted behaviours
//!
//! - `ScriptHost` - owns the Rhai engine with the script API registered
//! - `ScriptBehaviour` - a compiled script ticked by the update manager
//! - `register_script_factory` - exposes the `script` component type to scenes
//!
//! A script's hooks are the callback functions it defines:
//! `on_update`, `on_fixed_update` and `on_late_update`. They are detected
//! once, when the script is compiled.

pub mod api;
pub mod behaviour;
pub mod context;
pub mod engine;

pub use behaviour::ScriptBehaviour;
pub use engine::ScriptHost;

use cadence_core::CadenceError;
use cadence_scene::BehaviourFactory;
use std::path::PathBuf;
use std::rc::Rc;

/// Register the `script` component type: `source` is a path relative to `scripts_dir`
pub fn register_script_factory(factory: &mut BehaviourFactory, host: Rc<ScriptHost>, scripts_dir: PathBuf) {
    factory.register("script", move |component| {
        let source = component
            .get_str("source")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CadenceError::InvalidComponent {
                component: component.kind.clone(),
                reason: "missing 'source'".to_string(),
            })?;
        let behaviour = host.load_file(&scripts_dir.join(source), source)?;
        log::debug!("[script] Loaded: {} {:?}", source, behaviour.hooks_declared());
        Ok(Box::new(behaviour))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_runtime::{Behaviour, Pass};
    use cadence_scene::ComponentDef;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cadence-script-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn script_component_loads_from_directory() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("spin.rhai"), "fn on_fixed_update() { }").unwrap();
        let mut factory = BehaviourFactory::new();
        register_script_factory(&mut factory, ScriptHost::new(), dir.clone());

        let behaviour = factory
            .create(&ComponentDef::new("script").with_param("source", "spin.rhai"))
            .unwrap();

        assert_eq!(behaviour.name(), "spin.rhai");
        assert_eq!(Pass::classify(behaviour.hooks()), Some(Pass::FixedUpdate));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn script_component_requires_source() {
        let mut factory = BehaviourFactory::new();
        register_script_factory(&mut factory, ScriptHost::new(), scratch_dir("nosource"));

        let result = factory.create(&ComponentDef::new("script"));
        assert!(matches!(result, Err(CadenceError::InvalidComponent { .. })));
    }
}

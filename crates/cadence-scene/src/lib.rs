//! Cadence Scene - the object system behaviours live in
//!
//! - `SceneGraph` - named objects with parents and attached behaviours
//! - `SceneFile` - TOML scene format
//! - `BehaviourFactory` / `load_scene` - build a graph from a scene file
//! - `builtin` - ready-made behaviours for scenes and tests

pub mod builtin;
mod factory;
mod format;
mod graph;
mod loader;

pub use factory::BehaviourFactory;
pub use format::{ComponentDef, ObjectDef, SceneFile, SceneMetadata};
pub use graph::SceneGraph;
pub use loader::{load_scene, load_scene_string};

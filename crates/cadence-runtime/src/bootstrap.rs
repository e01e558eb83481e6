//! Startup discovery of behaviours already present in the scene

use crate::behaviour::BehaviourHandle;
use cadence_core::{ObjectId, Result};
use serde::{Deserialize, Serialize};

/// The host object system, as seen by the update manager
pub trait SceneSource {
    /// Objects without a parent, in scene order
    fn root_objects(&self) -> Vec<ObjectId>;

    /// Direct children of `object`, in scene order
    fn children(&self, object: ObjectId) -> Vec<ObjectId>;

    /// Behaviours attached to `object`, in attachment order
    fn behaviours(&self, object: ObjectId) -> Vec<BehaviourHandle>;

    /// Destroy `object` and drop the behaviours it owns
    fn destroy(&mut self, object: ObjectId) -> Result<()>;
}

/// How far the startup scan descends into the object hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapScan {
    /// Only behaviours on root objects; children must register themselves
    #[default]
    Roots,
    /// Root objects and all of their descendants, depth first
    Hierarchy,
}

/// Collect the behaviours the startup scan should register, in visit order
pub(crate) fn discover(scene: &impl SceneSource, scan: BootstrapScan) -> Vec<BehaviourHandle> {
    let mut found = Vec::new();
    for root in scene.root_objects() {
        match scan {
            BootstrapScan::Roots => found.extend(scene.behaviours(root)),
            BootstrapScan::Hierarchy => visit(scene, root, &mut found),
        }
    }
    found
}

fn visit(scene: &impl SceneSource, object: ObjectId, found: &mut Vec<BehaviourHandle>) {
    found.extend(scene.behaviours(object));
    for child in scene.children(object) {
        visit(scene, child, found);
    }
}

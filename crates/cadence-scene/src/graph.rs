//! SceneGraph - objects, hierarchy and behaviour ownership

use bimap::BiMap;
use cadence_core::{CadenceError, ObjectId, Result};
use cadence_runtime::{Behaviour, BehaviourHandle, SceneSource};
use std::collections::HashMap;

/// An object and the behaviours attached to it
struct SceneObject {
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    behaviours: Vec<BehaviourHandle>,
}

/// The object system owning every behaviour.
///
/// Holds the only long-lived strong handles to behaviours, so destroying an
/// object is what invalidates the update manager's references to them.
#[derive(Default)]
pub struct SceneGraph {
    objects: HashMap<ObjectId, SceneObject>,
    /// Object name <-> ObjectId
    names: BiMap<String, ObjectId>,
    /// Spawn order, used for deterministic root enumeration
    order: Vec<ObjectId>,
}

impl SceneGraph {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new root object with a unique name
    pub fn spawn(&mut self, name: impl Into<String>) -> Result<ObjectId> {
        let name = name.into();
        if self.names.contains_left(&name) {
            return Err(CadenceError::DuplicateObjectName(name));
        }

        let id = ObjectId::new();
        self.objects.insert(
            id,
            SceneObject {
                parent: None,
                children: Vec::new(),
                behaviours: Vec::new(),
            },
        );
        self.names.insert(name, id);
        self.order.push(id);
        Ok(id)
    }

    /// Make `child` a child of `parent`, detaching it from any previous parent
    pub fn set_parent(&mut self, child: ObjectId, parent: ObjectId) -> Result<()> {
        if !self.objects.contains_key(&parent) {
            return Err(CadenceError::ObjectNotFound(parent.to_string()));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(CadenceError::SceneError(format!(
                "cannot parent {} under its own descendant {}",
                child, parent
            )));
        }

        let previous = self
            .objects
            .get_mut(&child)
            .ok_or_else(|| CadenceError::ObjectNotFound(child.to_string()))?
            .parent
            .replace(parent);
        if let Some(previous) = previous.and_then(|p| self.objects.get_mut(&p)) {
            previous.children.retain(|c| *c != child);
        }
        if let Some(parent) = self.objects.get_mut(&parent) {
            parent.children.push(child);
        }
        Ok(())
    }

    /// Set parent by name
    pub fn set_parent_by_name(&mut self, child: &str, parent: &str) -> Result<()> {
        let child_id = self
            .get_id(child)
            .ok_or_else(|| CadenceError::ObjectNotFound(child.to_string()))?;
        let parent_id = self
            .get_id(parent)
            .ok_or_else(|| CadenceError::ObjectNotFound(parent.to_string()))?;
        self.set_parent(child_id, parent_id)
    }

    fn is_ancestor(&self, ancestor: ObjectId, object: ObjectId) -> bool {
        let mut current = self.parent(object);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Attach a behaviour to an object, returning the owning handle
    pub fn attach<B: Behaviour + 'static>(&mut self, object: ObjectId, behaviour: B) -> Result<BehaviourHandle> {
        self.ensure_exists(object)?;
        self.push_handle(BehaviourHandle::new(object, behaviour))
    }

    pub fn attach_boxed(&mut self, object: ObjectId, behaviour: Box<dyn Behaviour>) -> Result<BehaviourHandle> {
        self.ensure_exists(object)?;
        self.push_handle(BehaviourHandle::from_boxed(object, behaviour))
    }

    fn ensure_exists(&self, object: ObjectId) -> Result<()> {
        if self.objects.contains_key(&object) {
            Ok(())
        } else {
            Err(CadenceError::ObjectNotFound(object.to_string()))
        }
    }

    fn push_handle(&mut self, handle: BehaviourHandle) -> Result<BehaviourHandle> {
        let entry = self
            .objects
            .get_mut(&handle.owner())
            .ok_or_else(|| CadenceError::ObjectNotFound(handle.owner().to_string()))?;
        entry.behaviours.push(handle.clone());
        Ok(handle)
    }

    /// Remove an object and all its descendants, dropping their behaviours
    pub fn destroy(&mut self, object: ObjectId) -> Result<()> {
        let parent = self
            .objects
            .get(&object)
            .ok_or_else(|| CadenceError::ObjectNotFound(object.to_string()))?
            .parent;
        if let Some(parent) = parent.and_then(|p| self.objects.get_mut(&p)) {
            parent.children.retain(|c| *c != object);
        }

        let mut pending = vec![object];
        let mut removed = 0;
        while let Some(id) = pending.pop() {
            if let Some(entry) = self.objects.remove(&id) {
                pending.extend(entry.children);
                self.names.remove_by_right(&id);
                removed += 1;
            }
        }
        self.order.retain(|id| self.objects.contains_key(id));
        log::debug!("[scene] destroyed {} ({} objects)", object, removed);
        Ok(())
    }

    /// Destroy an object by name
    pub fn destroy_by_name(&mut self, name: &str) -> Result<()> {
        let id = self
            .get_id(name)
            .ok_or_else(|| CadenceError::ObjectNotFound(name.to_string()))?;
        self.destroy(id)
    }

    pub fn get_id(&self, name: &str) -> Option<ObjectId> {
        self.names.get_by_left(name).copied()
    }

    pub fn get_name(&self, id: ObjectId) -> Option<&str> {
        self.names.get_by_right(&id).map(|s| s.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_left(name)
    }

    pub fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.objects.get(&object).and_then(|o| o.parent)
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// All objects in spawn order
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.order.iter().copied()
    }

    /// Behaviours attached to an object, in attachment order
    pub fn behaviours_of(&self, object: ObjectId) -> &[BehaviourHandle] {
        self.objects
            .get(&object)
            .map(|o| o.behaviours.as_slice())
            .unwrap_or(&[])
    }
}

impl SceneSource for SceneGraph {
    fn root_objects(&self) -> Vec<ObjectId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.parent(*id).is_none())
            .collect()
    }

    fn children(&self, object: ObjectId) -> Vec<ObjectId> {
        self.objects
            .get(&object)
            .map(|o| o.children.clone())
            .unwrap_or_default()
    }

    fn behaviours(&self, object: ObjectId) -> Vec<BehaviourHandle> {
        self.behaviours_of(object).to_vec()
    }

    fn destroy(&mut self, object: ObjectId) -> Result<()> {
        SceneGraph::destroy(self, object)
    }
}

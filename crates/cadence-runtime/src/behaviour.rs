//! Behaviour trait and entity references

use crate::manager::FrameContext;
use cadence_core::ObjectId;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// The set of hooks a behaviour actually implements.
///
/// Resolved once when a [`BehaviourHandle`] is created and cached on every
/// reference derived from it, so the dispatcher never re-queries it per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hooks {
    pub update: bool,
    pub fixed_update: bool,
    pub late_update: bool,
}

impl Hooks {
    pub const NONE: Hooks = Hooks {
        update: false,
        fixed_update: false,
        late_update: false,
    };
    pub const UPDATE: Hooks = Hooks {
        update: true,
        ..Hooks::NONE
    };
    pub const FIXED_UPDATE: Hooks = Hooks {
        fixed_update: true,
        ..Hooks::NONE
    };
    pub const LATE_UPDATE: Hooks = Hooks {
        late_update: true,
        ..Hooks::NONE
    };

    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    pub fn with_fixed_update(mut self) -> Self {
        self.fixed_update = true;
        self
    }

    pub fn with_late_update(mut self) -> Self {
        self.late_update = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        !(self.update || self.fixed_update || self.late_update)
    }
}

/// An entity that can be ticked by the [`UpdateManager`](crate::UpdateManager)
///
/// Every hook defaults to a no-op. Implementors must report the hooks they
/// override through [`Behaviour::hooks`]; a hook that is not declared there
/// is never called.
pub trait Behaviour {
    /// Human-readable name, used in logs
    fn name(&self) -> &str;

    /// Which hooks this behaviour overrides
    fn hooks(&self) -> Hooks {
        Hooks::NONE
    }

    /// Called once per frame during the update pass
    fn update(&mut self, _ctx: &mut FrameContext<'_>) {}

    /// Called during each fixed-timestep pass
    fn fixed_update(&mut self, _ctx: &mut FrameContext<'_>) {}

    /// Called once per frame after the update and fixed passes
    fn late_update(&mut self, _ctx: &mut FrameContext<'_>) {}
}

/// Owning handle to a behaviour, held by the object system.
///
/// Dropping every handle to a behaviour invalidates the registry's
/// references to it.
#[derive(Clone)]
pub struct BehaviourHandle {
    inner: Rc<RefCell<dyn Behaviour>>,
    reference: BehaviourRef,
}

impl BehaviourHandle {
    /// Wrap a behaviour owned by `owner`, resolving its hooks
    pub fn new<B: Behaviour + 'static>(owner: ObjectId, behaviour: B) -> Self {
        let hooks = behaviour.hooks();
        Self::from_shared(owner, hooks, Rc::new(RefCell::new(behaviour)))
    }

    pub fn from_boxed(owner: ObjectId, behaviour: Box<dyn Behaviour>) -> Self {
        let hooks = behaviour.hooks();
        Self::from_shared(owner, hooks, Rc::new(RefCell::new(BoxedBehaviour(behaviour))))
    }

    fn from_shared(owner: ObjectId, hooks: Hooks, inner: Rc<RefCell<dyn Behaviour>>) -> Self {
        let reference = BehaviourRef {
            inner: Rc::downgrade(&inner),
            owner,
            hooks,
        };
        Self { inner, reference }
    }

    pub fn owner(&self) -> ObjectId {
        self.reference.owner
    }

    pub fn hooks(&self) -> Hooks {
        self.reference.hooks
    }

    /// Non-owning reference with the same identity
    pub fn downgrade(&self) -> BehaviourRef {
        self.reference.clone()
    }

    /// Read-only access to the behaviour, `None` while a hook is running on it
    pub fn with<R>(&self, f: impl FnOnce(&dyn Behaviour) -> R) -> Option<R> {
        self.inner.try_borrow().ok().map(|b| f(&*b))
    }
}

impl AsRef<BehaviourRef> for BehaviourHandle {
    fn as_ref(&self) -> &BehaviourRef {
        &self.reference
    }
}

impl fmt::Debug for BehaviourHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourHandle")
            .field("owner", &self.reference.owner)
            .field("hooks", &self.reference.hooks)
            .finish()
    }
}

/// Non-owning reference to a behaviour, as stored in the registry.
///
/// Two references are equal when they point at the same behaviour.
#[derive(Clone)]
pub struct BehaviourRef {
    inner: Weak<RefCell<dyn Behaviour>>,
    owner: ObjectId,
    hooks: Hooks,
}

impl BehaviourRef {
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    pub fn hooks(&self) -> Hooks {
        self.hooks
    }

    /// False once the object system has dropped the behaviour
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub(crate) fn upgrade(&self) -> Option<Rc<RefCell<dyn Behaviour>>> {
        self.inner.upgrade()
    }
}

impl AsRef<BehaviourRef> for BehaviourRef {
    fn as_ref(&self) -> &BehaviourRef {
        self
    }
}

impl PartialEq for BehaviourRef {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for BehaviourRef {}

impl fmt::Debug for BehaviourRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourRef")
            .field("owner", &self.owner)
            .field("hooks", &self.hooks)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Lets a boxed trait object live behind `Rc<RefCell<dyn Behaviour>>`
struct BoxedBehaviour(Box<dyn Behaviour>);

impl Behaviour for BoxedBehaviour {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn hooks(&self) -> Hooks {
        self.0.hooks()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        self.0.update(ctx)
    }

    fn fixed_update(&mut self, ctx: &mut FrameContext<'_>) {
        self.0.fixed_update(ctx)
    }

    fn late_update(&mut self, ctx: &mut FrameContext<'_>) {
        self.0.late_update(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Behaviour for Plain {
        fn name(&self) -> &str {
            "plain"
        }
    }

    struct Mover;

    impl Behaviour for Mover {
        fn name(&self) -> &str {
            "mover"
        }

        fn hooks(&self) -> Hooks {
            Hooks::UPDATE.with_late_update()
        }
    }

    #[test]
    fn hooks_default_to_none() {
        let handle = BehaviourHandle::new(ObjectId::new(), Plain);
        assert!(handle.hooks().is_empty());
        assert_eq!(handle.with(|b| b.name().to_string()).as_deref(), Some("plain"));
    }

    #[test]
    fn hooks_are_cached_on_references() {
        let handle = BehaviourHandle::new(ObjectId::new(), Mover);
        let reference = handle.downgrade();
        assert!(reference.hooks().update);
        assert!(reference.hooks().late_update);
        assert!(!reference.hooks().fixed_update);
    }

    #[test]
    fn identity_is_by_allocation() {
        let owner = ObjectId::new();
        let a = BehaviourHandle::new(owner, Plain);
        let b = BehaviourHandle::new(owner, Plain);
        assert_eq!(a.downgrade(), a.clone().downgrade());
        assert_ne!(a.downgrade(), b.downgrade());
    }

    #[test]
    fn reference_dies_with_last_handle() {
        let handle = BehaviourHandle::new(ObjectId::new(), Plain);
        let reference = handle.downgrade();
        let copy = handle.clone();
        drop(handle);
        assert!(reference.is_alive());
        drop(copy);
        assert!(!reference.is_alive());
        assert!(reference.upgrade().is_none());
    }
}

//! Membership registry: one list of behaviour references per pass

use crate::behaviour::BehaviourRef;
use crate::pass::Pass;
use cadence_core::ObjectId;
use std::rc::Rc;

/// Ordered membership list for a single pass.
///
/// The backing slice is never mutated in place. Every add or remove builds a
/// new slice and swaps it in, so a [`snapshot`](PassList::snapshot) taken
/// before the mutation keeps iterating the old contents untouched.
#[derive(Debug, Clone)]
pub struct PassList {
    entries: Rc<[BehaviourRef]>,
    /// Shadows `entries.len()` for the empty fast path
    count: usize,
}

impl Default for PassList {
    fn default() -> Self {
        Self::new()
    }
}

impl PassList {
    pub fn new() -> Self {
        Self {
            entries: Rc::from(Vec::new()),
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The current contents; unaffected by later mutations
    pub fn snapshot(&self) -> Rc<[BehaviourRef]> {
        Rc::clone(&self.entries)
    }

    pub fn contains(&self, target: &BehaviourRef) -> bool {
        self.entries.iter().any(|entry| entry == target)
    }

    /// Append at the end, producing a list one entry longer
    pub fn push(&mut self, entry: BehaviourRef) {
        let mut extended = Vec::with_capacity(self.entries.len() + 1);
        extended.extend(self.entries.iter().cloned());
        extended.push(entry);
        self.entries = extended.into();
        self.count += 1;
    }

    /// Remove the first entry identical to `target`, keeping the others in order.
    /// Returns false if it was not present.
    pub fn remove(&mut self, target: &BehaviourRef) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry == target) else {
            return false;
        };
        let mut retracted = Vec::with_capacity(self.entries.len() - 1);
        retracted.extend(self.entries[..index].iter().cloned());
        retracted.extend(self.entries[index + 1..].iter().cloned());
        self.entries = retracted.into();
        self.count -= 1;
        true
    }
}

/// The three pass membership lists plus pending destroy requests.
///
/// Holds only weak references: the object system owns every behaviour, and a
/// behaviour it drops simply becomes a dead entry that dispatch skips.
#[derive(Debug, Default)]
pub struct Registry {
    update: PassList,
    fixed_update: PassList,
    late_update: PassList,
    destroy_requests: Vec<ObjectId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, pass: Pass) -> &PassList {
        match pass {
            Pass::Update => &self.update,
            Pass::FixedUpdate => &self.fixed_update,
            Pass::LateUpdate => &self.late_update,
        }
    }

    fn list_mut(&mut self, pass: Pass) -> &mut PassList {
        match pass {
            Pass::Update => &mut self.update,
            Pass::FixedUpdate => &mut self.fixed_update,
            Pass::LateUpdate => &mut self.late_update,
        }
    }

    /// Classify `target` and append it to the matching pass list.
    ///
    /// Returns the chosen pass, or `None` if the entity overrides no hook (in
    /// which case nothing is registered). Adding the same entity twice
    /// registers it twice.
    pub fn add(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        let target = target.as_ref();
        let hooks = target.hooks();
        let pass = Pass::classify(hooks)?;

        let dropped = Pass::dropped_by_classification(hooks);
        if !dropped.is_empty() {
            log::debug!(
                "[registry] {} registered for {}; hooks {:?} will not be dispatched",
                target.owner(),
                pass,
                dropped
            );
        }

        self.list_mut(pass).push(target.clone());
        log::trace!("[registry] added {} to {}", target.owner(), pass);
        Some(pass)
    }

    /// Remove one occurrence of `target` from the first list that holds it,
    /// searching update, fixed update, then late update.
    ///
    /// Returns the pass it was removed from, or `None` if it was not registered.
    pub fn remove(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        let target = target.as_ref();
        let pass = Pass::ALL
            .into_iter()
            .find(|pass| self.list_mut(*pass).remove(target))?;
        log::trace!("[registry] removed {} from {}", target.owner(), pass);
        Some(pass)
    }

    /// Remove `target`, then request destruction of the object that owns it.
    ///
    /// The request is queued and carried out by
    /// [`UpdateManager::apply_destroy_requests`](crate::UpdateManager::apply_destroy_requests).
    pub fn remove_and_destroy(&mut self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        let target = target.as_ref();
        let pass = self.remove(target);
        if !self.destroy_requests.contains(&target.owner()) {
            self.destroy_requests.push(target.owner());
        }
        pass
    }

    /// Which pass `target` is registered in, if any
    pub fn pass_of(&self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> Option<Pass> {
        let target = target.as_ref();
        Pass::ALL
            .into_iter()
            .find(|pass| self.list(*pass).contains(target))
    }

    pub fn contains(&self, target: &(impl AsRef<BehaviourRef> + ?Sized)) -> bool {
        self.pass_of(target).is_some()
    }

    pub fn len(&self, pass: Pass) -> usize {
        self.list(pass).len()
    }

    pub fn is_empty(&self, pass: Pass) -> bool {
        self.list(pass).is_empty()
    }

    /// Total registrations across all passes
    pub fn total(&self) -> usize {
        Pass::ALL.into_iter().map(|pass| self.len(pass)).sum()
    }

    /// Snapshot of a pass list's entries
    pub fn entries(&self, pass: Pass) -> Rc<[BehaviourRef]> {
        self.list(pass).snapshot()
    }

    /// Objects waiting to be destroyed, in request order
    pub fn pending_destroys(&self) -> &[ObjectId] {
        &self.destroy_requests
    }

    pub fn drain_destroy_requests(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.destroy_requests)
    }
}

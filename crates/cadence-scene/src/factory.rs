//! BehaviourFactory - maps component type names to constructors

use crate::format::ComponentDef;
use cadence_core::{CadenceError, Result};
use cadence_runtime::Behaviour;
use std::collections::BTreeMap;

type Constructor = Box<dyn Fn(&ComponentDef) -> Result<Box<dyn Behaviour>>>;

/// Builds behaviours from scene component definitions
#[derive(Default)]
pub struct BehaviourFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl BehaviourFactory {
    /// A factory with no component types
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory preloaded with the [`builtin`](crate::builtin) behaviours
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        crate::builtin::register_builtins(&mut factory);
        factory
    }

    /// Register a constructor for `kind`, replacing any previous one
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(&ComponentDef) -> Result<Box<dyn Behaviour>> + 'static,
    {
        self.constructors.insert(kind.into(), Box::new(constructor));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered component type names, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(|k| k.as_str())
    }

    /// Build the behaviour described by `component`
    pub fn create(&self, component: &ComponentDef) -> Result<Box<dyn Behaviour>> {
        let constructor = self
            .constructors
            .get(&component.kind)
            .ok_or_else(|| CadenceError::UnknownComponent(component.kind.clone()))?;
        constructor(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Idle;

    #[test]
    fn unknown_kind_is_an_error() {
        let factory = BehaviourFactory::new();
        let result = factory.create(&ComponentDef::new("missing"));
        assert!(matches!(result, Err(CadenceError::UnknownComponent(k)) if k == "missing"));
    }

    #[test]
    fn registered_constructor_is_used() {
        let mut factory = BehaviourFactory::new();
        factory.register("idle", |_| Ok(Box::new(Idle::new("custom"))));

        let behaviour = factory.create(&ComponentDef::new("idle")).unwrap();
        assert_eq!(behaviour.name(), "custom");
        assert!(factory.contains("idle"));
    }

    #[test]
    fn builtins_are_listed() {
        let factory = BehaviourFactory::with_builtins();
        let kinds: Vec<_> = factory.kinds().collect();
        assert_eq!(kinds, vec!["fixed_counter", "idle", "late_probe", "lifetime"]);
    }
}

//! Builtin behaviours available to every scene

use crate::factory::BehaviourFactory;
use crate::format::ComponentDef;
use cadence_core::{CadenceError, Result};
use cadence_runtime::{Behaviour, FrameContext, Hooks};

/// Register every builtin component type
pub fn register_builtins(factory: &mut BehaviourFactory) {
    factory.register("lifetime", |c| Ok(Box::new(Lifetime::from_component(c)?)));
    factory.register("fixed_counter", |c| Ok(Box::new(FixedCounter::from_component(c)?)));
    factory.register("late_probe", |c| Ok(Box::new(LateProbe::from_component(c))));
    factory.register("idle", |c| Ok(Box::new(Idle::new(label(c, "idle")))));
}

fn label(component: &ComponentDef, fallback: &str) -> String {
    component.get_str("label").unwrap_or(fallback).to_string()
}

fn non_negative(component: &ComponentDef, key: &str, default: u64) -> Result<u64> {
    match component.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_integer()
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| CadenceError::InvalidComponent {
                component: component.kind.clone(),
                reason: format!("{} must be a non-negative integer", key),
            }),
    }
}

/// Destroys its object after a number of update passes
pub struct Lifetime {
    label: String,
    remaining: u64,
}

impl Lifetime {
    pub fn new(label: impl Into<String>, frames: u64) -> Self {
        Self {
            label: label.into(),
            remaining: frames,
        }
    }

    fn from_component(component: &ComponentDef) -> Result<Self> {
        let frames = non_negative(component, "frames", 1)?;
        Ok(Self::new(label(component, "lifetime"), frames))
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Behaviour for Lifetime {
    fn name(&self) -> &str {
        &self.label
    }

    fn hooks(&self) -> Hooks {
        Hooks::UPDATE
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            log::info!("[{}] lifetime over, destroying {}", self.label, ctx.owner());
            ctx.destroy_self();
        }
    }
}

/// Counts fixed-update steps, logging every `log_every` steps
pub struct FixedCounter {
    label: String,
    steps: u64,
    log_every: u64,
}

impl FixedCounter {
    pub fn new(label: impl Into<String>, log_every: u64) -> Self {
        Self {
            label: label.into(),
            steps: 0,
            log_every,
        }
    }

    fn from_component(component: &ComponentDef) -> Result<Self> {
        let log_every = non_negative(component, "log_every", 0)?;
        Ok(Self::new(label(component, "fixed_counter"), log_every))
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Behaviour for FixedCounter {
    fn name(&self) -> &str {
        &self.label
    }

    fn hooks(&self) -> Hooks {
        Hooks::FIXED_UPDATE
    }

    fn fixed_update(&mut self, ctx: &mut FrameContext<'_>) {
        self.steps += 1;
        if self.log_every > 0 && self.steps % self.log_every == 0 {
            log::info!(
                "[{}] {} fixed steps ({:.3}s simulated)",
                self.label,
                self.steps,
                self.steps as f64 * ctx.delta_time()
            );
        }
    }
}

/// Logs every late-update invocation at debug level
pub struct LateProbe {
    label: String,
    calls: u64,
}

impl LateProbe {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            calls: 0,
        }
    }

    fn from_component(component: &ComponentDef) -> Self {
        Self::new(label(component, "late_probe"))
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Behaviour for LateProbe {
    fn name(&self) -> &str {
        &self.label
    }

    fn hooks(&self) -> Hooks {
        Hooks::LATE_UPDATE
    }

    fn late_update(&mut self, ctx: &mut FrameContext<'_>) {
        self.calls += 1;
        log::debug!(
            "[{}] late update, frame {} t={:.3}",
            self.label,
            ctx.frame(),
            ctx.total_time()
        );
    }
}

/// Overrides no hook; never registered
pub struct Idle {
    label: String,
}

impl Idle {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Behaviour for Idle {
    fn name(&self) -> &str {
        &self.label
    }
}

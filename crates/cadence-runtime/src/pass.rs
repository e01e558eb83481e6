//! Dispatch passes and the capability classifier

use crate::behaviour::Hooks;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three ordered per-frame dispatch phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Update,
    FixedUpdate,
    LateUpdate,
}

impl Pass {
    /// All passes in per-frame dispatch order
    pub const ALL: [Pass; 3] = [Pass::Update, Pass::FixedUpdate, Pass::LateUpdate];

    /// Pick the single pass list an entity with `hooks` belongs to.
    ///
    /// First match wins: update, then fixed update, then late update. An
    /// entity overriding several hooks is only ever ticked for the first one;
    /// its other hooks are never invoked. Returns `None` when no hook is
    /// overridden.
    pub fn classify(hooks: Hooks) -> Option<Pass> {
        if hooks.update {
            Some(Pass::Update)
        } else if hooks.fixed_update {
            Some(Pass::FixedUpdate)
        } else if hooks.late_update {
            Some(Pass::LateUpdate)
        } else {
            None
        }
    }

    /// Hooks declared in `hooks` that [`Pass::classify`] leaves unreachable
    pub fn dropped_by_classification(hooks: Hooks) -> Vec<Pass> {
        let Some(chosen) = Pass::classify(hooks) else {
            return Vec::new();
        };
        Pass::ALL
            .into_iter()
            .filter(|pass| *pass != chosen && pass.is_declared_in(hooks))
            .collect()
    }

    /// Whether `hooks` declares this pass's hook
    pub fn is_declared_in(self, hooks: Hooks) -> bool {
        match self {
            Pass::Update => hooks.update,
            Pass::FixedUpdate => hooks.fixed_update,
            Pass::LateUpdate => hooks.late_update,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pass::Update => "update",
            Pass::FixedUpdate => "fixed_update",
            Pass::LateUpdate => "late_update",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

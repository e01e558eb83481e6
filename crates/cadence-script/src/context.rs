//! Script execution context and command types
//!
//! ScriptCallContext is the shared state read and written by Rhai API
//! functions while a hook runs. Commands collected during a call are applied
//! by the calling behaviour once the script returns.

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Deferred actions requested by a script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Log { level: LogLevel, message: String },
    /// Stop ticking this behaviour
    Unregister,
    /// Stop ticking this behaviour and destroy its object
    Destroy,
}

/// Shared state for the script currently executing
#[derive(Debug, Default)]
pub struct ScriptCallContext {
    pub frame: u64,
    pub delta_time: f64,
    pub total_time: f64,
    pub commands: Vec<ScriptCommand>,
}

impl ScriptCallContext {
    pub fn new() -> Self {
        Self::default()
    }
}

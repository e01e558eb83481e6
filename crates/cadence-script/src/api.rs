//! Rhai API function registration
//!
//! All functions accessible from Rhai scripts are registered here.
//! They talk to the update manager through the shared ScriptCallContext.

use crate::context::{LogLevel, ScriptCallContext, ScriptCommand};
use rhai::Engine;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type SharedContext = Arc<Mutex<ScriptCallContext>>;

/// Register all API functions on the Rhai engine
pub fn register_all(engine: &mut Engine, ctx: SharedContext) {
    register_time_api(engine, ctx.clone());
    register_lifecycle_api(engine, ctx.clone());
    register_log_api(engine, ctx);
}

pub(crate) fn lock(ctx: &Mutex<ScriptCallContext>) -> MutexGuard<'_, ScriptCallContext> {
    ctx.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── Time API ────────────────────────────────────────────

fn register_time_api(engine: &mut Engine, ctx: SharedContext) {
    {
        let ctx = ctx.clone();
        engine.register_fn("delta_time", move || -> f64 { lock(&ctx).delta_time });
    }
    {
        let ctx = ctx.clone();
        engine.register_fn("total_time", move || -> f64 { lock(&ctx).total_time });
    }
    engine.register_fn("frame", move || -> i64 { lock(&ctx).frame as i64 });
}

// ─── Lifecycle API ───────────────────────────────────────

fn register_lifecycle_api(engine: &mut Engine, ctx: SharedContext) {
    {
        let ctx = ctx.clone();
        engine.register_fn("unregister", move || {
            lock(&ctx).commands.push(ScriptCommand::Unregister);
        });
    }
    engine.register_fn("destroy", move || {
        lock(&ctx).commands.push(ScriptCommand::Destroy);
    });
}

// ─── Log API ─────────────────────────────────────────────

fn register_log_api(engine: &mut Engine, ctx: SharedContext) {
    for (name, level) in [
        ("log", LogLevel::Info),
        ("log_warn", LogLevel::Warn),
        ("log_error", LogLevel::Error),
    ] {
        let ctx = ctx.clone();
        engine.register_fn(name, move |msg: &str| {
            lock(&ctx).commands.push(ScriptCommand::Log {
                level,
                message: msg.to_string(),
            });
        });
    }
}

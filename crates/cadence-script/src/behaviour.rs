//! ScriptBehaviour: a compiled script ticked by the update manager

use crate::api::lock;
use crate::context::{LogLevel, ScriptCommand};
use crate::engine::{has_function, ScriptHost};
use cadence_core::{CadenceError, Result};
use cadence_runtime::{Behaviour, FrameContext, Hooks};
use rhai::{CallFnOptions, Dynamic, Map, Scope, AST};
use std::rc::Rc;

const ON_UPDATE: &str = "on_update";
const ON_FIXED_UPDATE: &str = "on_fixed_update";
const ON_LATE_UPDATE: &str = "on_late_update";

/// A Rhai script acting as a behaviour.
///
/// Rhai functions can't see the global scope, so module-level `let`
/// variables are collected into an object map after the top-level code runs.
/// Hooks reach that map through `this`, and writes persist between calls.
pub struct ScriptBehaviour {
    host: Rc<ScriptHost>,
    label: String,
    ast: AST,
    state: Dynamic,
    hooks: Hooks,
}

impl ScriptBehaviour {
    /// Wrap a compiled script, running its top-level statements once
    pub fn new(host: Rc<ScriptHost>, label: impl Into<String>, ast: AST) -> Result<Self> {
        let label = label.into();
        let hooks = Hooks {
            update: has_function(&ast, ON_UPDATE),
            fixed_update: has_function(&ast, ON_FIXED_UPDATE),
            late_update: has_function(&ast, ON_LATE_UPDATE),
        };

        let mut scope = Scope::new();
        host.engine()
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| CadenceError::ScriptError(format!("{}: {}", label, e)))?;
        let state: Map = scope
            .iter()
            .map(|(name, _, value)| (name.into(), value))
            .collect();

        let behaviour = Self {
            host,
            label,
            ast,
            state: Dynamic::from_map(state),
            hooks,
        };
        // Top-level code may log but has no behaviour to unregister yet
        behaviour.flush_logs();

        Ok(behaviour)
    }

    /// The hooks this script defines
    pub fn hooks_declared(&self) -> Hooks {
        self.hooks
    }

    /// Read a module-level variable as last written by the script
    pub fn variable<T: Clone + std::any::Any>(&self, name: &str) -> Option<T> {
        let state = self.state.read_lock::<Map>()?;
        state.get(name)?.clone().try_cast::<T>()
    }

    fn call(&mut self, function: &str, ctx: &mut FrameContext<'_>) {
        {
            let mut c = lock(&self.host.ctx);
            c.frame = ctx.frame();
            c.delta_time = ctx.delta_time();
            c.total_time = ctx.total_time();
            c.commands.clear();
        }

        let options = CallFnOptions::new()
            .eval_ast(false)
            .bind_this_ptr(&mut self.state);
        let result = self.host.engine().call_fn_with_options::<()>(
            options,
            &mut Scope::new(),
            &self.ast,
            function,
            (),
        );
        if let Err(e) = result {
            log::error!("[script] {} error ({}): {}", function, self.label, e);
        }

        let commands = std::mem::take(&mut lock(&self.host.ctx).commands);
        for command in commands {
            match command {
                ScriptCommand::Log { level, message } => self.emit(level, &message),
                ScriptCommand::Unregister => {
                    ctx.remove_self();
                }
                ScriptCommand::Destroy => {
                    ctx.destroy_self();
                }
            }
        }
    }

    fn flush_logs(&self) {
        let commands = std::mem::take(&mut lock(&self.host.ctx).commands);
        for command in commands {
            match command {
                ScriptCommand::Log { level, message } => self.emit(level, &message),
                ScriptCommand::Unregister | ScriptCommand::Destroy => log::warn!(
                    "[script] {}: {:?} in top-level code ignored; call it from a hook",
                    self.label,
                    command
                ),
            }
        }
    }

    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => log::info!("[{}] {}", self.label, message),
            LogLevel::Warn => log::warn!("[{}] {}", self.label, message),
            LogLevel::Error => log::error!("[{}] {}", self.label, message),
        }
    }
}

impl Behaviour for ScriptBehaviour {
    fn name(&self) -> &str {
        &self.label
    }

    fn hooks(&self) -> Hooks {
        self.hooks
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        self.call(ON_UPDATE, ctx);
    }

    fn fixed_update(&mut self, ctx: &mut FrameContext<'_>) {
        self.call(ON_FIXED_UPDATE, ctx);
    }

    fn late_update(&mut self, ctx: &mut FrameContext<'_>) {
        self.call(ON_LATE_UPDATE, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_runtime::{BehaviourHandle, BootstrapScan, GameClock, Pass, UpdateManager};
    use cadence_scene::SceneGraph;

    #[test]
    fn hooks_follow_defined_functions() {
        let host = ScriptHost::new();
        let script = host
            .load_str("fn on_fixed_update() { } fn on_late_update() { }", "physics")
            .unwrap();
        assert_eq!(script.hooks_declared(), Hooks::FIXED_UPDATE.with_late_update());
        assert_eq!(Pass::classify(script.hooks()), Some(Pass::FixedUpdate));
    }

    #[test]
    fn script_without_hooks_is_not_registered() {
        let host = ScriptHost::new();
        let script = host.load_str("let unused = 1;", "inert").unwrap();
        let handle = BehaviourHandle::new(cadence_core::ObjectId::new(), script);
        let mut manager = UpdateManager::new();
        assert_eq!(manager.add(&handle), None);
    }

    #[test]
    fn scope_persists_between_updates() {
        let mut scene = SceneGraph::new();
        let object = scene.spawn("counter").unwrap();
        let host = ScriptHost::new();
        let script = host
            .load_str(
                r#"
                let count = 0;
                fn on_update() {
                    this.count += 1;
                    if this.count == 3 { unregister(); }
                }
                "#,
                "counter",
            )
            .unwrap();
        scene.attach(object, script).unwrap();
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);
        let mut clock = GameClock::new();

        for _ in 0..3 {
            let report = manager.run_frame_with(0.0, &mut clock, &mut scene);
            assert_eq!(report.update.invoked, 1);
        }

        assert_eq!(manager.registry().len(Pass::Update), 0);
        let report = manager.run_frame_with(0.0, &mut clock, &mut scene);
        assert_eq!(report.update.invoked, 0);
        let script = scene.behaviours_of(object)[0]
            .with(|b| b.name().to_string())
            .unwrap();
        assert_eq!(script, "counter");
    }

    #[test]
    fn unregister_stops_future_updates() {
        let mut scene = SceneGraph::new();
        let object = scene.spawn("once").unwrap();
        let host = ScriptHost::new();
        let script = host
            .load_str("fn on_late_update() { log(`frame ${frame()}`); unregister(); }", "once")
            .unwrap();
        scene.attach(object, script).unwrap();
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);
        let mut clock = GameClock::new();

        let first = manager.run_frame_with(0.0, &mut clock, &mut scene);
        let second = manager.run_frame_with(0.0, &mut clock, &mut scene);

        assert_eq!(first.late_update.invoked, 1);
        assert_eq!(second.late_update.invoked, 0);
        assert!(scene.contains(object));
    }

    #[test]
    fn destroy_removes_object() {
        let mut scene = SceneGraph::new();
        let object = scene.spawn("fuse").unwrap();
        let host = ScriptHost::new();
        let script = host
            .load_str("fn on_update() { if frame() >= 2 { destroy(); } }", "fuse")
            .unwrap();
        scene.attach(object, script).unwrap();
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);
        let mut clock = GameClock::new();

        assert_eq!(manager.run_frame_with(0.0, &mut clock, &mut scene).destroyed, 0);
        assert_eq!(manager.run_frame_with(0.0, &mut clock, &mut scene).destroyed, 1);
        assert!(!scene.contains(object));
        assert_eq!(manager.registry().total(), 0);
    }

    #[test]
    fn runtime_error_does_not_stop_the_pass() {
        let mut scene = SceneGraph::new();
        let object = scene.spawn("mixed").unwrap();
        let host = ScriptHost::new();
        let broken = host
            .load_str("fn on_update() { undefined_function(); }", "broken")
            .unwrap();
        let fine = host
            .load_str("fn on_update() { }", "fine")
            .unwrap();
        scene.attach(object, broken).unwrap();
        scene.attach(object, fine).unwrap();
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);

        assert_eq!(manager.update().invoked, 2);
    }

    #[test]
    fn lifecycle_calls_at_load_are_ignored() {
        let mut scene = SceneGraph::new();
        let object = scene.spawn("eager").unwrap();
        let host = ScriptHost::new();
        let script = host
            .load_str("unregister(); destroy(); fn on_update() { }", "eager")
            .unwrap();
        scene.attach(object, script).unwrap();
        let mut manager = UpdateManager::bootstrap(&scene, BootstrapScan::Roots);
        let mut clock = GameClock::new();

        for _ in 0..2 {
            let report = manager.run_frame_with(0.0, &mut clock, &mut scene);
            assert_eq!(report.update.invoked, 1);
            assert_eq!(report.destroyed, 0);
        }
        assert!(scene.contains(object));
        assert!(lock(&host.ctx).commands.is_empty());
    }

    #[test]
    fn top_level_variables_are_readable() {
        let host = ScriptHost::new();
        let script = host.load_str("let speed = 4;", "vars").unwrap();
        assert_eq!(script.variable::<i64>("speed"), Some(4));
        assert_eq!(script.variable::<i64>("missing"), None);
    }
}

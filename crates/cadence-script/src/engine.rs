//! ScriptHost - Rhai engine setup and script compilation

use crate::api;
use crate::behaviour::ScriptBehaviour;
use crate::context::ScriptCallContext;
use cadence_core::{CadenceError, Result};
use rhai::{Engine, AST};
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Owns the Rhai engine and the context shared by every script it runs
pub struct ScriptHost {
    engine: Engine,
    pub(crate) ctx: Arc<Mutex<ScriptCallContext>>,
}

impl ScriptHost {
    pub fn new() -> Rc<Self> {
        let ctx = Arc::new(Mutex::new(ScriptCallContext::new()));
        let mut engine = Engine::new();

        // Register all API functions
        api::register_all(&mut engine, ctx.clone());

        Rc::new(Self { engine, ctx })
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile a Rhai source string into an AST
    pub fn compile(&self, source: &str) -> Result<AST> {
        self.engine
            .compile(source)
            .map_err(|e| CadenceError::ScriptError(e.to_string()))
    }

    /// Compile source text into a ready-to-tick behaviour
    pub fn load_str(self: &Rc<Self>, source: &str, label: &str) -> Result<ScriptBehaviour> {
        let ast = self.compile(source)?;
        ScriptBehaviour::new(Rc::clone(self), label, ast)
    }

    /// Compile a script file into a ready-to-tick behaviour
    pub fn load_file(self: &Rc<Self>, path: &Path, label: &str) -> Result<ScriptBehaviour> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            CadenceError::ScriptError(format!("failed to read {}: {}", path.display(), e))
        })?;
        let ast = self
            .compile(&source)
            .map_err(|e| CadenceError::ScriptError(format!("{}: {}", path.display(), e)))?;
        ScriptBehaviour::new(Rc::clone(self), label, ast)
    }
}

/// Check if an AST contains a function definition with the given name
pub(crate) fn has_function(ast: &AST, name: &str) -> bool {
    ast.iter_functions().any(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_is_reported() {
        let host = ScriptHost::new();
        let result = host.compile("fn on_update( {");
        assert!(matches!(result, Err(CadenceError::ScriptError(_))));
    }

    #[test]
    fn detects_defined_functions() {
        let host = ScriptHost::new();
        let ast = host
            .compile("fn on_late_update() { } fn helper(x) { x }")
            .unwrap();
        assert!(has_function(&ast, "on_late_update"));
        assert!(has_function(&ast, "helper"));
        assert!(!has_function(&ast, "on_update"));
    }

    #[test]
    fn missing_file_is_a_script_error() {
        let host = ScriptHost::new();
        let result = host.load_file(Path::new("/nonexistent/cadence/none.rhai"), "none");
        assert!(matches!(result, Err(CadenceError::ScriptError(_))));
    }
}

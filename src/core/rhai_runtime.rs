//! [Rhai](https://rhai.rs) as the target language for generated functions.
//!
//! Scripts only reach the host through functions registered on the engine.

use rhai::{CallFnOptions, Dynamic, Engine, Scope, AST};
use serde_json::Value;
use std::sync::Arc;

use crate::core::runtime::{Implementation, ScriptRuntime};
use crate::error::{Error, Result};

/// Name of the function treated as the artifact's default export.
pub const ENTRYPOINT: &str = "run";

const EXPORT_DIRECTIVE: &str = "Create a Rhai script that defines one function named `run`, \
taking one parameter per input argument in the listed order, that fulfills the instructed \
Objective with the given inputs and returns the expected output. Do not call the function.";

/// Loads generated Rhai source with a shared [`Engine`].
#[derive(Clone)]
pub struct RhaiRuntime {
    engine: Arc<Engine>,
}

impl Default for RhaiRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RhaiRuntime {
    /// Standard engine with `print`/`debug` routed to the `log` facade.
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.on_print(|text| log::info!("[rhai] {}", text));
        engine.on_debug(|text, source, pos| {
            log::debug!("[rhai] {} @ {} {}", text, source.unwrap_or("<artifact>"), pos)
        });
        Self::with_engine(engine)
    }

    /// Use a caller-configured engine (registered host functions, operation limits, ...).
    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// `run` if defined, otherwise the only function name in the script.
    fn entrypoint(ast: &AST) -> Result<String> {
        let mut names: Vec<String> = ast.iter_functions().map(|f| f.name.to_string()).collect();
        if names.iter().any(|name| name == ENTRYPOINT) {
            return Ok(ENTRYPOINT.to_string());
        }

        names.sort();
        names.dedup();
        match names.as_slice() {
            [only] => Ok(only.clone()),
            [] => Err(Error::Load("script defines no function".to_string())),
            many => Err(Error::Load(format!(
                "script defines {} functions ({}) but none is named `{}`",
                many.len(),
                many.join(", "),
                ENTRYPOINT
            ))),
        }
    }
}

impl ScriptRuntime for RhaiRuntime {
    fn language(&self) -> &str {
        "Rhai"
    }

    fn extension(&self) -> &str {
        "rhai"
    }

    fn export_directive(&self) -> &str {
        EXPORT_DIRECTIVE
    }

    fn load(&self, source: &str) -> Result<Arc<dyn Implementation>> {
        let ast = self
            .engine
            .compile(source)
            .map_err(|e| Error::Load(e.to_string()))?;
        let entrypoint = Self::entrypoint(&ast)?;

        // Top-level statements run once, here; calls skip them.
        self.engine
            .run_ast_with_scope(&mut Scope::new(), &ast)
            .map_err(|e| Error::Load(e.to_string()))?;
        log::debug!("Loaded Rhai artifact with entrypoint `{}`", entrypoint);

        Ok(Arc::new(RhaiFunction {
            engine: Arc::clone(&self.engine),
            ast,
            entrypoint,
        }))
    }
}

/// A compiled script plus the name of the function to call.
struct RhaiFunction {
    engine: Arc<Engine>,
    ast: AST,
    entrypoint: String,
}

impl Implementation for RhaiFunction {
    fn call(&self, args: &[Value]) -> Result<Value> {
        let args = args
            .iter()
            .map(rhai::serde::to_dynamic)
            .collect::<std::result::Result<Vec<Dynamic>, _>>()
            .map_err(|e| Error::Execution(e.to_string()))?;

        let options = CallFnOptions::new().eval_ast(false);
        let mut scope = Scope::new();
        let result: Dynamic = self
            .engine
            .call_fn_with_options(options, &mut scope, &self.ast, &self.entrypoint, args)
            .map_err(|e| Error::Execution(e.to_string()))?;

        rhai::serde::from_dynamic::<Value>(&result).map_err(|e| Error::Execution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity() {
        let runtime = RhaiRuntime::new();
        let echo = runtime.load("fn run(input) { input }").unwrap();
        assert_eq!(echo.call(&[json!("test")]).unwrap(), json!("test"));
    }

    #[test]
    fn test_single_function_without_run_name() {
        let runtime = RhaiRuntime::new();
        let add = runtime.load("fn add(a, b) { a + b }").unwrap();
        assert_eq!(add.call(&[json!(2), json!(3)]).unwrap(), json!(5));
    }

    #[test]
    fn test_structured_values_cross_the_boundary() {
        let runtime = RhaiRuntime::new();
        let greet = runtime
            .load(
                r#"
                fn run(person) {
                    #{ greeting: "Hello, " + person.name, tags: [person.age, true] }
                }
                "#,
            )
            .unwrap();
        let result = greet.call(&[json!({"name": "Ada", "age": 36})]).unwrap();
        assert_eq!(result, json!({"greeting": "Hello, Ada", "tags": [36, true]}));
    }

    #[test]
    fn test_unit_result_is_null() {
        let runtime = RhaiRuntime::new();
        let noop = runtime.load("fn run() { }").unwrap();
        assert_eq!(noop.call(&[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_load_failures() {
        let runtime = RhaiRuntime::new();
        assert!(matches!(runtime.load("fn run(x) {"), Err(Error::Load(_))));
        assert!(matches!(runtime.load("let x = 1;"), Err(Error::Load(_))));
        assert!(matches!(
            runtime.load("fn a() { 1 } fn b() { 2 }"),
            Err(Error::Load(_))
        ));
    }

    #[test]
    fn test_failing_top_level_fails_load() {
        let runtime = RhaiRuntime::new();
        assert!(matches!(
            runtime.load(r#"fn run(x) { x } throw "top";"#),
            Err(Error::Load(_))
        ));
    }

    #[test]
    fn test_top_level_runs_once_at_load() {
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut engine = Engine::new();
        let hits = Arc::clone(&counter);
        engine.register_fn("tick", move || {
            hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        let runtime = RhaiRuntime::with_engine(engine);

        let echo = runtime.load("tick(); fn run(x) { x }").unwrap();
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);

        assert_eq!(echo.call(&[json!("a")]).unwrap(), json!("a"));
        assert_eq!(echo.call(&[json!("b")]).unwrap(), json!("b"));
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_runtime_error() {
        let runtime = RhaiRuntime::new();
        let fail = runtime.load(r#"fn run(x) { throw "nope"; }"#).unwrap();
        assert!(matches!(fail.call(&[json!(1)]), Err(Error::Execution(_))));
    }
}

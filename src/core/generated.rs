use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::core::runtime::Implementation;
use crate::core::signature::Signature;
use crate::core::validation::{SchemaCompiler, Validator};
use crate::error::{compact, Error, Result};

/// A loaded artifact wrapped with input and output schema checks.
pub struct GeneratedFn {
    signature: Signature,
    implementation: Arc<dyn Implementation>,
    input_validators: Vec<Box<dyn Validator>>,
    output_validator: Box<dyn Validator>,
}

impl fmt::Debug for GeneratedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedFn")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl GeneratedFn {
    /// Compile one validator per input schema and one for the output.
    pub fn new(
        signature: Signature,
        implementation: Arc<dyn Implementation>,
        compiler: &dyn SchemaCompiler,
    ) -> Result<Self> {
        let input_validators = signature
            .inputs
            .iter()
            .map(|schema| compiler.compile(schema))
            .collect::<Result<Vec<_>>>()?;
        let output_validator = compiler.compile(&signature.output)?;

        Ok(Self {
            signature,
            implementation,
            input_validators,
            output_validator,
        })
    }

    pub fn id(&self) -> &str {
        &self.signature.id
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Validate `args`, call the implementation and check its result.
    ///
    /// Stops at the first argument that fails its schema. A result that does not
    /// match the output schema is logged and returned as is.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if args.len() != self.input_validators.len() {
            return Err(Error::ArgumentCount {
                expected: self.input_validators.len(),
                found: args.len(),
            });
        }

        for ((arg, validator), schema) in args
            .iter()
            .zip(&self.input_validators)
            .zip(&self.signature.inputs)
        {
            if !validator.validate(arg) {
                return Err(Error::InvalidArgument {
                    value: arg.clone(),
                    schema: schema.clone(),
                });
            }
        }

        let result = self.implementation.call(args)?;

        if !self.output_validator.validate(&result) {
            log::warn!(
                "Output of function: {} doesn't conform to schema: {}",
                self.signature.id,
                compact(&self.signature.output)
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::JsonSchemaCompiler;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Keeps every record emitted while tests in this binary run.
    struct Capture {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture {
        records: Mutex::new(Vec::new()),
    };

    fn captured(needle: &str) -> Vec<(log::Level, String)> {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);
        CAPTURE
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message.contains(needle))
            .cloned()
            .collect()
    }

    fn echo_signature() -> Signature {
        crate::signature!("echo: string -> string")
    }

    fn echo() -> Arc<dyn Implementation> {
        Arc::new(|args: &[Value]| -> Result<Value> { Ok(args[0].clone()) })
    }

    #[test]
    fn test_valid_call() {
        let f = GeneratedFn::new(echo_signature(), echo(), &JsonSchemaCompiler).unwrap();
        assert_eq!(f.call(&[json!("test")]).unwrap(), json!("test"));
    }

    #[test]
    fn test_invalid_argument_is_rejected_before_calling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let implementation: Arc<dyn Implementation> =
            Arc::new(move |args: &[Value]| -> Result<Value> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(args[0].clone())
            });

        let f = GeneratedFn::new(echo_signature(), implementation, &JsonSchemaCompiler).unwrap();
        let err = f.call(&[json!(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid arg: 1, expected type: {"type":"string"}"#
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_failing_argument_is_reported() {
        let signature = Signature::new("pair")
            .input(json!({"type": "string"}))
            .input(json!({"type": "integer"}))
            .input(json!({"type": "boolean"}));
        let f = GeneratedFn::new(signature, echo(), &JsonSchemaCompiler).unwrap();

        let err = f.call(&[json!("a"), json!("b"), json!("c")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid arg: b, expected type: {"type":"integer"}"#
        );
    }

    #[test]
    fn test_output_mismatch_returns_value_and_warns() {
        assert!(captured("count_vowels").is_empty());

        let signature = crate::signature!("count_vowels: string -> integer");
        let f = GeneratedFn::new(signature, echo(), &JsonSchemaCompiler).unwrap();
        assert_eq!(f.call(&[json!("not a number")]).unwrap(), json!("not a number"));

        assert_eq!(
            captured("count_vowels"),
            vec![(
                log::Level::Warn,
                r#"Output of function: count_vowels doesn't conform to schema: {"type":"integer"}"#
                    .to_string()
            )]
        );
    }

    #[test]
    fn test_conforming_output_does_not_warn() {
        let _ = captured("shout");

        let f = GeneratedFn::new(
            crate::signature!("shout: string -> string"),
            echo(),
            &JsonSchemaCompiler,
        )
        .unwrap();
        f.call(&[json!("hey")]).unwrap();

        assert!(captured("shout").iter().all(|(level, _)| *level != log::Level::Warn));
    }

    #[test]
    fn test_argument_count() {
        let f = GeneratedFn::new(echo_signature(), echo(), &JsonSchemaCompiler).unwrap();
        assert!(matches!(
            f.call(&[]),
            Err(Error::ArgumentCount { expected: 1, found: 0 })
        ));
        assert!(matches!(
            f.call(&[json!("a"), json!("b")]),
            Err(Error::ArgumentCount { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_invalid_schema_fails_construction() {
        let signature = Signature::new("bad").input(json!({"type": 5}));
        assert!(matches!(
            GeneratedFn::new(signature, echo(), &JsonSchemaCompiler),
            Err(Error::Schema(_))
        ));
    }
}

//! Schema validation capability.
//!
//! The wrapper only needs "compile a schema once, then answer yes/no per value".
//! [`JsonSchemaCompiler`] provides that over the `jsonschema` crate; any other
//! validator can be plugged in through [`SchemaCompiler`].

use serde_json::Value;

use crate::error::{Error, Result};

/// A compiled schema.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> bool;
}

/// Turns a JSON Schema document into a [`Validator`].
pub trait SchemaCompiler: Send + Sync {
    fn compile(&self, schema: &Value) -> Result<Box<dyn Validator>>;
}

/// Default compiler backed by `jsonschema`. The draft is detected from `$schema`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSchemaCompiler;

impl Validator for jsonschema::Validator {
    fn validate(&self, value: &Value) -> bool {
        self.is_valid(value)
    }
}

impl SchemaCompiler for JsonSchemaCompiler {
    fn compile(&self, schema: &Value) -> Result<Box<dyn Validator>> {
        let validator = jsonschema::validator_for(schema).map_err(|e| Error::Schema(e.to_string()))?;
        Ok(Box::new(validator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_validation() {
        let validator = JsonSchemaCompiler.compile(&json!({"type": "string"})).unwrap();
        assert!(validator.validate(&json!("test")));
        assert!(!validator.validate(&json!(1)));
    }

    #[test]
    fn test_object_validation() {
        let validator = JsonSchemaCompiler
            .compile(&json!({
                "type": "object",
                "properties": { "name": { "type": "string" }, "age": { "type": "integer" } },
                "required": ["name"]
            }))
            .unwrap();
        assert!(validator.validate(&json!({"name": "Ada", "age": 36})));
        assert!(!validator.validate(&json!({"age": 36})));
        assert!(!validator.validate(&json!({"name": "Ada", "age": "old"})));
    }

    #[test]
    fn test_invalid_schema_is_an_error() {
        let result = JsonSchemaCompiler.compile(&json!({"type": "not-a-type"}));
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

use crate::error::Error;

/// The contract of a generated function: its identifier, one JSON Schema per
/// positional argument and one for the return value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signature {
    pub id: String,
    pub inputs: Vec<Value>,
    pub output: Value,
}

impl Signature {
    /// Start a signature with no inputs and an unconstrained (`{}`) output.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
            output: json!({}),
        }
    }

    /// Append the schema of the next positional argument.
    pub fn input(mut self, schema: Value) -> Self {
        self.inputs.push(schema);
        self
    }

    /// Set the schema of the return value.
    pub fn output(mut self, schema: Value) -> Self {
        self.output = schema;
        self
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

impl FromStr for Signature {
    type Err = Error;

    /// Parses shorthand syntax: "id: string, number -> boolean"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, types) = s
            .split_once(':')
            .ok_or_else(|| Error::Signature("Signature must start with '<id>:'".to_string()))?;

        let id = id.trim();
        if id.is_empty() {
            return Err(Error::Signature("Signature id cannot be empty".to_string()));
        }

        let parts: Vec<&str> = types.split("->").collect();
        if parts.len() != 2 {
            return Err(Error::Signature(
                "Signature must contain exactly one '->'".to_string(),
            ));
        }

        let inputs = parts[0]
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| json!({ "type": t }))
            .collect();

        let output = match parts[1].trim() {
            "" => return Err(Error::Signature("Signature must name an output type".to_string())),
            t => json!({ "type": t }),
        };

        Ok(Signature {
            id: id.to_string(),
            inputs,
            output,
        })
    }
}

/// Macro for rapid signature creation: signature!("echo: string -> string")
#[macro_export]
macro_rules! signature {
    ($s:expr) => {
        $s.parse::<$crate::Signature>().expect("Invalid signature shorthand")
    };
}

//! Prompt construction for code generation.

use serde_json::Value;
use std::fmt;

use crate::error::compact;

/// The free-text objective a generated function should fulfill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Template-literal assembly: each segment is followed by the value at the same
    /// position, if any. Extra segments contribute only themselves.
    pub fn interpolate<V: fmt::Display>(segments: &[&str], values: &[V]) -> Self {
        let text = segments
            .iter()
            .enumerate()
            .fold(String::new(), |mut acc, (index, segment)| {
                acc.push_str(segment);
                if let Some(value) = values.get(index) {
                    acc.push_str(&value.to_string());
                }
                acc
            });
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instruction {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Instruction {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Build an [`Instruction`] with `format!` syntax: `instruction!("sum the first {n} items")`
#[macro_export]
macro_rules! instruction {
    ($($arg:tt)*) => {
        $crate::Instruction::new(format!($($arg)*))
    };
}

/// Render the user prompt for one generation request.
///
/// `directive` tells the model how the target runtime expects the function to be
/// exported; see [`ScriptRuntime::export_directive`](crate::ScriptRuntime::export_directive).
pub fn build_prompt(
    directive: &str,
    instruction: &Instruction,
    inputs: &[Value],
    output: &Value,
) -> String {
    let inputs = compact(&Value::Array(inputs.to_vec()));
    format!(
        "Please respond in generated code only!\n\
         \n\
         {directive}\n\
         \n\
         Objective:\n\
         {instruction}\n\
         \n\
         The list of JSON Schema for each input argument:\n\
         {inputs}\n\
         \n\
         Expected output structure in JSON schema format:\n\
         {output}",
        output = compact(output),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpolate_interleaves_values() {
        let instruction = Instruction::interpolate(&["add ", " to the input, then ", ""], &[3, 4]);
        assert_eq!(instruction.as_str(), "add 3 to the input, then 4");
    }

    #[test]
    fn test_interpolate_extra_segments() {
        let instruction = Instruction::interpolate::<&str>(&["echo ", "back"], &[]);
        assert_eq!(instruction.as_str(), "echo back");
    }

    #[test]
    fn test_instruction_macro() {
        let n = 3;
        assert_eq!(
            crate::instruction!("return the first {n} items").as_str(),
            "return the first 3 items"
        );
    }

    #[test]
    fn test_build_prompt_embeds_everything() {
        let prompt = build_prompt(
            "Define fn run.",
            &"echo the input back as the output".into(),
            &[json!({"type": "string"})],
            &json!({"type": "string"}),
        );

        assert!(prompt.starts_with("Please respond in generated code only!\n\nDefine fn run.\n"));
        assert!(prompt.contains("Objective:\necho the input back as the output\n"));
        assert!(prompt.contains(
            "The list of JSON Schema for each input argument:\n[{\"type\":\"string\"}]\n"
        ));
        assert!(prompt.ends_with(
            "Expected output structure in JSON schema format:\n{\"type\":\"string\"}"
        ));
    }
}

//! Calculator Tool
//!
//! Evaluates arithmetic expressions with the grammar-based evaluator.

use async_trait::async_trait;
use serde_json::{json, Value};
use voice_dispatch_core::{InputSchema, PropertySchema, Tool, ToolDescriptor, ToolError};

use crate::engines::expression;

pub struct CalculatorTool {
    descriptor: ToolDescriptor,
}

impl CalculatorTool {
    pub const ID: &'static str = "calculator";

    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                Self::ID,
                "Perform mathematical calculations",
                InputSchema::object().property(
                    "expression",
                    PropertySchema::string(
                        "Mathematical expression to evaluate (e.g., \"2 + 3 * 4\")",
                    ),
                    true,
                ),
                InputSchema::object()
                    .property("result", PropertySchema::number("Evaluated value"), true)
                    .property(
                        "expression",
                        PropertySchema::string("The expression as given"),
                        true,
                    ),
            ),
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let expression = input
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::missing_field("expression"))?;

        let result = expression::evaluate(expression)?;

        Ok(json!({
            "result": result,
            "expression": expression,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calculator_echoes_expression() {
        let tool = CalculatorTool::new();
        let output = tool
            .execute(json!({ "expression": "2 + 3 * 4" }))
            .await
            .unwrap();
        assert_eq!(output["result"], 14.0);
        assert_eq!(output["expression"], "2 + 3 * 4");
        assert!(tool.descriptor().output_schema.validate(&output).is_ok());
    }

    #[tokio::test]
    async fn test_calculator_schema_requires_expression() {
        let tool = CalculatorTool::new();
        let err = tool.validate(&json!({})).unwrap_err();
        assert_eq!(err.message, "expression is required");
    }
}

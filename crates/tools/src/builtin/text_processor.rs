//! Text Processor Tool

use async_trait::async_trait;
use serde_json::{json, Value};
use voice_dispatch_core::{InputSchema, PropertySchema, Tool, ToolDescriptor, ToolError};

use crate::engines::text::{self, FormatStyle, TextOperation};

pub struct TextProcessorTool {
    descriptor: ToolDescriptor,
    default_max_length: usize,
}

impl TextProcessorTool {
    pub const ID: &'static str = "text-processor";

    pub fn new(default_max_length: usize) -> Self {
        let options = InputSchema::object()
            .property(
                "language",
                PropertySchema::string("Target language for translation"),
                false,
            )
            .property(
                "format",
                PropertySchema::enum_type(
                    "Text formatting option",
                    FormatStyle::ALL.iter().map(|s| s.to_string()).collect(),
                ),
                false,
            )
            .property(
                "maxLength",
                PropertySchema::integer("Maximum length for summary")
                    .with_minimum(1.0)
                    .with_default(json!(default_max_length)),
                false,
            )
            .property(
                "pattern",
                PropertySchema::string("Regex pattern for extraction"),
                false,
            );

        let input = InputSchema::object()
            .property(
                "operation",
                PropertySchema::enum_type(
                    "Text operation to perform",
                    TextOperation::NAMES.iter().map(|s| s.to_string()).collect(),
                ),
                true,
            )
            .property("text", PropertySchema::string("Input text to process"), true)
            .property(
                "options",
                PropertySchema::object("Operation-specific options", options),
                false,
            );

        let metadata = InputSchema::object()
            .property("originalLength", PropertySchema::integer("Input length"), false)
            .property("processedLength", PropertySchema::integer("Output length"), false)
            .property("wordCount", PropertySchema::integer("Word count"), false)
            .property("matchCount", PropertySchema::integer("Number of matches"), false);

        let output = InputSchema::object()
            .property("result", PropertySchema::string("Processed text"), true)
            .property("operation", PropertySchema::string("Operation performed"), true)
            .property(
                "metadata",
                PropertySchema::object("Lengths and counts", metadata),
                true,
            );

        Self {
            descriptor: ToolDescriptor::new(
                Self::ID,
                "Process and manipulate text in various ways",
                input,
                output,
            ),
            default_max_length,
        }
    }

    /// Build the typed operation from validated arguments
    pub fn parse_operation(&self, input: &Value) -> Result<TextOperation, ToolError> {
        let operation = input
            .get("operation")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::missing_field("operation"))?;
        let text = input
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::missing_field("text"))?
            .to_string();

        let option = |name: &str| {
            input
                .get("options")
                .and_then(|o| o.get(name))
                .filter(|v| !v.is_null())
        };
        let required_str = |name: &str| {
            option(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| ToolError::missing_field(&format!("options.{}", name)))
        };

        Ok(match operation {
            "count" => TextOperation::Count { text },
            "translate" => TextOperation::Translate {
                text,
                language: required_str("language")?,
            },
            "summarize" => {
                let max_length = match option("maxLength") {
                    Some(v) => v
                        .as_u64()
                        .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0 && *f >= 1.0).map(|f| f as u64))
                        .filter(|n| *n >= 1)
                        .ok_or_else(|| {
                            ToolError::invalid_params("options.maxLength must be a positive integer")
                        })? as usize,
                    None => self.default_max_length,
                };
                TextOperation::Summarize { text, max_length }
            }
            "format" => TextOperation::Format {
                text,
                style: required_str("format")?.parse()?,
            },
            "extract" => TextOperation::Extract {
                text,
                pattern: required_str("pattern")?,
            },
            other => return Err(ToolError::unsupported_operation(other)),
        })
    }
}

#[async_trait]
impl Tool for TextProcessorTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let operation = self.parse_operation(&input)?;
        let output = text::process(&operation)?;
        serde_json::to_value(output).map_err(|e| ToolError::internal(e.to_string()))
    }
}

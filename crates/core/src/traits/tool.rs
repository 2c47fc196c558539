//! Tool contract
//!
//! A tool is a named, schema-described operation. The registry validates
//! untrusted arguments against [`ToolDescriptor::input_schema`] before a
//! handler ever sees them, so handlers only deal with well-typed input.
//!
//! Schemas are built with a small builder API and serialize to plain JSON
//! Schema so they can be published to language models and HTTP clients:
//!
//! ```ignore
//! let schema = InputSchema::object()
//!     .property("query", PropertySchema::string("Search query"), true)
//!     .property(
//!         "maxResults",
//!         PropertySchema::integer("Maximum number of results").with_minimum(1.0),
//!         false,
//!     );
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Default timeout for tool execution (30 seconds)
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Error taxonomy for tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownTool,
    InvalidInput,
    MissingField,
    InvalidDate,
    InvalidPattern,
    EvaluationError,
    UnsupportedOperation,
    ExecutionError,
    Timeout,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownTool => "unknown_tool",
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidPattern => "invalid_pattern",
            ErrorCode::EvaluationError => "evaluation_error",
            ErrorCode::UnsupportedOperation => "unsupported_operation",
            ErrorCode::ExecutionError => "execution_error",
            ErrorCode::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a tool handler
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::MissingField, format!("missing field: {}", field))
    }

    pub fn invalid_date(input: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidDate,
            format!("invalid date '{}': {}", input, reason),
        )
    }

    pub fn invalid_pattern(pattern: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidPattern,
            format!("invalid pattern '{}': {}", pattern, reason),
        )
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EvaluationError, message)
    }

    pub fn unsupported_operation(operation: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedOperation,
            format!("unsupported operation: {}", operation),
        )
    }

    pub fn timeout(name: &str, secs: u64) -> Self {
        Self::new(
            ErrorCode::Timeout,
            format!("tool '{}' timed out after {}s", name, secs),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExecutionError, message)
    }
}

/// JSON type of a schema property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Object,
    Array,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Integer => "integer",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            PropertyType::String => value.is_string(),
            PropertyType::Number => value.is_number(),
            PropertyType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().map(|n| n.fract() == 0.0).unwrap_or(false)
            }
            PropertyType::Object => value.is_object(),
            PropertyType::Array => value.is_array(),
        }
    }
}

/// Schema of a single property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub property_type: PropertyType,
    pub description: String,
    pub enum_values: Option<Vec<String>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub default: Option<Value>,
    /// Nested shape for `object` properties
    pub properties: Option<Box<InputSchema>>,
    /// Element schema for `array` properties
    pub items: Option<Box<PropertySchema>>,
}

impl PropertySchema {
    fn of(property_type: PropertyType, description: impl Into<String>) -> Self {
        Self {
            property_type,
            description: description.into(),
            enum_values: None,
            minimum: None,
            maximum: None,
            default: None,
            properties: None,
            items: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::of(PropertyType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::of(PropertyType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::of(PropertyType::Integer, description)
    }

    /// String restricted to a fixed set of values
    pub fn enum_type(description: impl Into<String>, values: Vec<String>) -> Self {
        let mut schema = Self::of(PropertyType::String, description);
        schema.enum_values = Some(values);
        schema
    }

    /// Nested object with its own properties
    pub fn object(description: impl Into<String>, shape: InputSchema) -> Self {
        let mut schema = Self::of(PropertyType::Object, description);
        schema.properties = Some(Box::new(shape));
        schema
    }

    pub fn array(description: impl Into<String>, items: PropertySchema) -> Self {
        let mut schema = Self::of(PropertyType::Array, description);
        schema.items = Some(Box::new(items));
        schema
    }

    pub fn with_minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Render as JSON Schema
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), json!(self.property_type.as_str()));
        if !self.description.is_empty() {
            out.insert("description".into(), json!(self.description));
        }
        if let Some(values) = &self.enum_values {
            out.insert("enum".into(), json!(values));
        }
        if let Some(min) = self.minimum {
            out.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            out.insert("maximum".into(), json!(max));
        }
        if let Some(default) = &self.default {
            out.insert("default".into(), default.clone());
        }
        if let Some(shape) = &self.properties {
            let nested = shape.to_json();
            if let Some(props) = nested.get("properties") {
                out.insert("properties".into(), props.clone());
            }
            if let Some(required) = nested.get("required") {
                out.insert("required".into(), required.clone());
            }
        }
        if let Some(items) = &self.items {
            out.insert("items".into(), items.to_json());
        }
        Value::Object(out)
    }
}

/// Object schema with ordered properties
///
/// Declaration order is kept so validation reports the same first violation
/// for the same input every time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSchema {
    properties: Vec<(String, PropertySchema)>,
    required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema, required: bool) -> Self {
        let name = name.into();
        if required {
            self.required.push(name.clone());
        }
        self.properties.push((name, schema));
        self
    }

    /// Render as JSON Schema
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json()))
            .collect();

        let mut out = Map::new();
        out.insert("type".into(), json!("object"));
        out.insert("properties".into(), Value::Object(properties));
        if !self.required.is_empty() {
            out.insert("required".into(), json!(self.required));
        }
        Value::Object(out)
    }

    /// Validate a value against this schema
    ///
    /// Fail-fast: returns the first violation as a human-readable message.
    /// Properties not declared in the schema are ignored; `null` counts as absent.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        self.validate_at(value, "")
    }

    fn validate_at(&self, value: &Value, prefix: &str) -> Result<(), String> {
        let object = value.as_object().ok_or_else(|| {
            if prefix.is_empty() {
                "arguments must be a JSON object".to_string()
            } else {
                format!("{} must be an object", prefix)
            }
        })?;

        for name in &self.required {
            match object.get(name) {
                None | Some(Value::Null) => {
                    return Err(format!("{} is required", join_path(prefix, name)))
                }
                Some(_) => {}
            }
        }

        for (name, schema) in &self.properties {
            match object.get(name) {
                None | Some(Value::Null) => continue,
                Some(v) => validate_property(&join_path(prefix, name), schema, v)?,
            }
        }

        Ok(())
    }
}

impl Serialize for InputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Validate one property value (type, enum membership, numeric range, nested shape)
pub fn validate_property(path: &str, schema: &PropertySchema, value: &Value) -> Result<(), String> {
    if !schema.property_type.matches(value) {
        return Err(format!(
            "{} must be of type {}",
            path,
            schema.property_type.as_str()
        ));
    }

    if let (Some(allowed), Some(s)) = (&schema.enum_values, value.as_str()) {
        if !allowed.iter().any(|a| a == s) {
            return Err(format!(
                "{} must be one of [{}], got '{}'",
                path,
                allowed.join(", "),
                s
            ));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = schema.minimum {
            if n < min {
                return Err(format!("{} must be >= {}", path, display_number(min)));
            }
        }
        if let Some(max) = schema.maximum {
            if n > max {
                return Err(format!("{} must be <= {}", path, display_number(max)));
            }
        }
    }

    if let Some(shape) = &schema.properties {
        shape.validate_at(value, path)?;
    }

    if let (Some(items), Some(elements)) = (&schema.items, value.as_array()) {
        for (i, element) in elements.iter().enumerate() {
            validate_property(&format!("{}[{}]", path, i), items, element)?;
        }
    }

    Ok(())
}

/// Declared contract of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Unique, stable identifier
    pub id: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub output_schema: InputSchema,
}

impl ToolDescriptor {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
        output_schema: InputSchema,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            input_schema,
            output_schema,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "description": self.description,
            "inputSchema": self.input_schema.to_json(),
            "outputSchema": self.output_schema.to_json(),
        })
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Callable operation
///
/// Implementations receive arguments that already passed
/// [`InputSchema::validate`]; they convert them into their own typed request
/// and return output matching [`ToolDescriptor::output_schema`].
#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    fn description(&self) -> &str {
        &self.descriptor().description
    }

    /// Validate raw arguments against the input schema
    fn validate(&self, input: &Value) -> Result<(), ToolError> {
        self.descriptor()
            .input_schema
            .validate(input)
            .map_err(ToolError::invalid_params)
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError>;

    /// Execution timeout in seconds
    fn timeout_secs(&self) -> u64 {
        DEFAULT_TOOL_TIMEOUT_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> InputSchema {
        InputSchema::object()
            .property(
                "operation",
                PropertySchema::enum_type("Operation", vec!["count".into(), "format".into()]),
                true,
            )
            .property("text", PropertySchema::string("Input text"), true)
            .property(
                "options",
                PropertySchema::object(
                    "Options",
                    InputSchema::object().property(
                        "maxLength",
                        PropertySchema::integer("Maximum length").with_minimum(1.0),
                        false,
                    ),
                ),
                false,
            )
    }

    #[test]
    fn test_valid_input() {
        let schema = sample_schema();
        assert!(schema
            .validate(&json!({ "operation": "count", "text": "a b" }))
            .is_ok());
        assert!(schema
            .validate(&json!({ "operation": "count", "text": "", "options": { "maxLength": 3 } }))
            .is_ok());
    }

    #[test]
    fn test_not_an_object() {
        let err = sample_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err, "arguments must be a JSON object");
    }

    #[test]
    fn test_first_violation_only() {
        // Both fields are wrong; the first declared required field wins.
        let err = sample_schema().validate(&json!({})).unwrap_err();
        assert_eq!(err, "operation is required");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = sample_schema()
            .validate(&json!({ "operation": "count", "text": null }))
            .unwrap_err();
        assert_eq!(err, "text is required");
    }

    #[test]
    fn test_enum_membership() {
        let err = sample_schema()
            .validate(&json!({ "operation": "shout", "text": "x" }))
            .unwrap_err();
        assert!(err.contains("operation must be one of [count, format]"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = sample_schema()
            .validate(&json!({ "operation": "count", "text": 42 }))
            .unwrap_err();
        assert_eq!(err, "text must be of type string");
    }

    #[test]
    fn test_nested_range() {
        let err = sample_schema()
            .validate(&json!({ "operation": "count", "text": "x", "options": { "maxLength": 0 } }))
            .unwrap_err();
        assert_eq!(err, "options.maxLength must be >= 1");

        let err = sample_schema()
            .validate(&json!({ "operation": "count", "text": "x", "options": { "maxLength": 2.5 } }))
            .unwrap_err();
        assert_eq!(err, "options.maxLength must be of type integer");
    }

    #[test]
    fn test_integer_accepts_whole_float() {
        let schema = InputSchema::object().property("n", PropertySchema::integer("n"), true);
        assert!(schema.validate(&json!({ "n": 5.0 })).is_ok());
    }

    #[test]
    fn test_array_items() {
        let schema = InputSchema::object().property(
            "tags",
            PropertySchema::array("Tags", PropertySchema::string("tag")),
            true,
        );
        let err = schema.validate(&json!({ "tags": ["a", 1] })).unwrap_err();
        assert_eq!(err, "tags[1] must be of type string");
    }

    #[test]
    fn test_schema_to_json() {
        let json = sample_schema().to_json();
        assert_eq!(json["type"], "object");
        assert_eq!(json["required"], json!(["operation", "text"]));
        assert_eq!(json["properties"]["operation"]["enum"], json!(["count", "format"]));
        assert_eq!(
            json["properties"]["options"]["properties"]["maxLength"]["minimum"],
            json!(1.0)
        );
    }

    #[test]
    fn test_tool_error_messages() {
        assert_eq!(ToolError::missing_field("date").to_string(), "missing field: date");
        assert_eq!(ToolError::missing_field("date").code, ErrorCode::MissingField);
        assert_eq!(
            ToolError::unsupported_operation("rewind").code,
            ErrorCode::UnsupportedOperation
        );
        assert_eq!(ToolError::timeout("calculator", 5).code, ErrorCode::Timeout);
    }
}

//! Date/Time Tool
//!
//! Converts raw arguments into a [`TemporalOperation`] and runs it.

use async_trait::async_trait;
use chrono_tz::Tz;
use serde_json::Value;
use voice_dispatch_core::{InputSchema, PropertySchema, Tool, ToolDescriptor, ToolError};

use crate::engines::temporal::{self, TemporalOperation, TimeUnit};

pub struct DateTimeTool {
    descriptor: ToolDescriptor,
    default_timezone: Tz,
}

impl DateTimeTool {
    pub const ID: &'static str = "datetime-tool";

    pub fn new(default_timezone: Tz) -> Self {
        let input = InputSchema::object()
            .property(
                "operation",
                PropertySchema::enum_type(
                    "Date/time operation to perform",
                    TemporalOperation::NAMES.iter().map(|s| s.to_string()).collect(),
                ),
                true,
            )
            .property(
                "date",
                PropertySchema::string("Date to operate on (ISO 8601 / RFC 3339)"),
                false,
            )
            .property(
                "amount",
                PropertySchema::integer("Amount to add or subtract"),
                false,
            )
            .property(
                "unit",
                PropertySchema::enum_type(
                    "Unit of the amount",
                    TimeUnit::ALL.iter().map(|s| s.to_string()).collect(),
                ),
                false,
            )
            .property(
                "compareDate",
                PropertySchema::string("Date to compare against"),
                false,
            )
            .property(
                "timezone",
                PropertySchema::string("IANA timezone").with_default(Value::String(
                    default_timezone.name().to_string(),
                )),
                false,
            );

        let output = InputSchema::object()
            .property("result", PropertySchema::string("Formatted result"), true)
            .property("operation", PropertySchema::string("Operation performed"), true)
            .property("timezone", PropertySchema::string("Zone used"), true)
            .property("iso", PropertySchema::string("RFC 3339 timestamp"), false)
            .property(
                "daysDifference",
                PropertySchema::integer("date - compareDate in whole days"),
                false,
            )
            .property(
                "earlier",
                PropertySchema::enum_type(
                    "Which date is earlier",
                    vec!["date".into(), "compareDate".into(), "same".into()],
                ),
                false,
            );

        Self {
            descriptor: ToolDescriptor::new(
                Self::ID,
                "Get the current time, format dates, add or subtract offsets and compare dates",
                input,
                output,
            ),
            default_timezone,
        }
    }

    /// Build the typed operation from validated arguments
    pub fn parse_operation(&self, input: &Value) -> Result<TemporalOperation, ToolError> {
        let operation = input
            .get("operation")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::missing_field("operation"))?;

        let timezone = match input.get("timezone").and_then(|v| v.as_str()) {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ToolError::invalid_params(format!("unknown timezone: {}", name)))?,
            None => self.default_timezone,
        };

        let date = || string_field(input, "date");

        Ok(match operation {
            "current" => TemporalOperation::Current { timezone },
            "format" => TemporalOperation::Format {
                date: date()?,
                timezone,
            },
            "add" => TemporalOperation::Add {
                date: date()?,
                amount: amount_field(input)?,
                unit: unit_field(input)?,
                timezone,
            },
            "subtract" => TemporalOperation::Subtract {
                date: date()?,
                amount: amount_field(input)?,
                unit: unit_field(input)?,
                timezone,
            },
            "compare" => TemporalOperation::Compare {
                date: date()?,
                compare_date: string_field(input, "compareDate")?,
                timezone,
            },
            other => return Err(ToolError::unsupported_operation(other)),
        })
    }
}

fn string_field(input: &Value, field: &str) -> Result<String, ToolError> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ToolError::missing_field(field))
}

fn amount_field(input: &Value) -> Result<i64, ToolError> {
    let value = input
        .get("amount")
        .filter(|v| !v.is_null())
        .ok_or_else(|| ToolError::missing_field("amount"))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| ToolError::invalid_params("amount must be an integer"))
}

fn unit_field(input: &Value) -> Result<TimeUnit, ToolError> {
    string_field(input, "unit")?.parse()
}

#[async_trait]
impl Tool for DateTimeTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let operation = self.parse_operation(&input)?;
        let output = temporal::execute(&operation)?;
        serde_json::to_value(output).map_err(|e| ToolError::internal(e.to_string()))
    }
}

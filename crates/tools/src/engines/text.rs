//! Text operation engine
//!
//! Lengths are counted in Unicode scalar values, so `summarize` never splits a
//! character and `count` reports what a reader would count.

use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use voice_dispatch_core::ToolError;

/// Appended to truncated summaries
pub const TRUNCATION_MARKER: &str = "...";

/// Result text of an extraction that matched nothing
pub const NO_MATCH_MARKER: &str = "No matches found";

/// Delimiter between extracted matches
pub const MATCH_DELIMITER: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    Upper,
    Lower,
    /// First letter of every whitespace-delimited token upper, rest lower
    Title,
    /// First letter of the whole text upper, rest lower
    Capitalize,
}

impl FormatStyle {
    pub const ALL: [&'static str; 4] = ["upper", "lower", "title", "capitalize"];
}

impl FromStr for FormatStyle {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(FormatStyle::Upper),
            "lower" => Ok(FormatStyle::Lower),
            "title" => Ok(FormatStyle::Title),
            "capitalize" => Ok(FormatStyle::Capitalize),
            other => Err(ToolError::invalid_params(format!("unknown format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextOperation {
    Count { text: String },
    /// Placeholder for an external translation service: echoes the text
    /// annotated with the target language, nothing is translated.
    Translate { text: String, language: String },
    Summarize { text: String, max_length: usize },
    Format { text: String, style: FormatStyle },
    Extract { text: String, pattern: String },
}

impl TextOperation {
    pub const NAMES: [&'static str; 5] = ["count", "translate", "summarize", "format", "extract"];

    pub fn name(&self) -> &'static str {
        match self {
            TextOperation::Count { .. } => "count",
            TextOperation::Translate { .. } => "translate",
            TextOperation::Summarize { .. } => "summarize",
            TextOperation::Format { .. } => "format",
            TextOperation::Extract { .. } => "extract",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextOutput {
    pub result: String,
    pub operation: String,
    pub metadata: TextMetadata,
}

pub fn process(operation: &TextOperation) -> Result<TextOutput, ToolError> {
    let (result, metadata) = match operation {
        TextOperation::Count { text } => {
            let chars = char_len(text);
            let words = word_count(text);
            (
                format!("Characters: {}, Words: {}", chars, words),
                TextMetadata {
                    original_length: Some(chars),
                    word_count: Some(words),
                    ..Default::default()
                },
            )
        }
        TextOperation::Translate { text, language } => (
            format!("[translation stub] {} → {}", text, language),
            TextMetadata {
                original_length: Some(char_len(text)),
                ..Default::default()
            },
        ),
        TextOperation::Summarize { text, max_length } => {
            let summary = summarize(text, *max_length);
            let processed = char_len(&summary);
            (
                summary,
                TextMetadata {
                    original_length: Some(char_len(text)),
                    processed_length: Some(processed),
                    ..Default::default()
                },
            )
        }
        TextOperation::Format { text, style } => {
            let formatted = format_text(text, *style);
            let processed = char_len(&formatted);
            (
                formatted,
                TextMetadata {
                    original_length: Some(char_len(text)),
                    processed_length: Some(processed),
                    ..Default::default()
                },
            )
        }
        TextOperation::Extract { text, pattern } => {
            let matches = extract(text, pattern)?;
            let result = if matches.is_empty() {
                NO_MATCH_MARKER.to_string()
            } else {
                matches.join(MATCH_DELIMITER)
            };
            (
                result,
                TextMetadata {
                    original_length: Some(char_len(text)),
                    match_count: Some(matches.len()),
                    ..Default::default()
                },
            )
        }
    };

    Ok(TextOutput {
        result,
        operation: operation.name().to_string(),
        metadata,
    })
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Words are runs of non-whitespace; blank text has none
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn summarize(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

pub fn format_text(text: &str, style: FormatStyle) -> String {
    match style {
        FormatStyle::Upper => text.to_uppercase(),
        FormatStyle::Lower => text.to_lowercase(),
        FormatStyle::Capitalize => capitalize(text),
        FormatStyle::Title => {
            let mut out = String::with_capacity(text.len());
            let mut token = String::new();
            for c in text.chars() {
                if c.is_whitespace() {
                    out.push_str(&capitalize(&token));
                    token.clear();
                    out.push(c);
                } else {
                    token.push(c);
                }
            }
            out.push_str(&capitalize(&token));
            out
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// All non-overlapping matches, in order
pub fn extract(text: &str, pattern: &str) -> Result<Vec<String>, ToolError> {
    let regex = Regex::new(pattern).map_err(|e| ToolError::invalid_pattern(pattern, e))?;
    Ok(regex
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect())
}

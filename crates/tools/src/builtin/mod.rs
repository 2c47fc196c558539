//! Built-in tools
//!
//! Each wrapper owns its descriptor and translates validated JSON arguments
//! into the typed request of its engine.

mod calculator;
mod datetime;
mod text_processor;
mod web_search;

pub use calculator::CalculatorTool;
pub use datetime::DateTimeTool;
pub use text_processor::TextProcessorTool;
pub use web_search::WebSearchTool;

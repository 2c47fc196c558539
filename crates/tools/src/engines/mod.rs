//! Pure operation engines behind the built-in tools
//!
//! Engines take typed requests and know nothing about JSON arguments or the
//! registry; the wrappers in [`crate::builtin`] do that translation.

pub mod expression;
pub mod search;
pub mod temporal;
pub mod text;

pub use expression::evaluate;
pub use search::{SearchHit, SearchProvider, StubSearchProvider};
pub use temporal::{Earlier, TemporalOperation, TemporalOutput, TimeUnit};
pub use text::{FormatStyle, TextMetadata, TextOperation, TextOutput};

//! The tools the TomGPT agent can call: web search, an LLM-assisted
//! calculator and, with the `document` feature, Kyudo manual lookup.

mod calculator;
mod error;
mod expression;

#[cfg(feature = "document")]
mod document;
#[cfg(feature = "search")]
mod search;

pub use calculator::{LlmMathTool, CALCULATOR_DESCRIPTION, CALCULATOR_NAME, LLM_MATH_TEMPLATE};
pub use error::CalculatorError;
pub use expression::{evaluate, format_number, MAX_DEPTH};

#[cfg(feature = "document")]
pub use document::{DocumentTool, DOCUMENT_DESCRIPTION, DOCUMENT_NAME};
#[cfg(feature = "search")]
pub use search::{
    DuckDuckGoSearch, DUCKDUCKGO_HTML_URL, NO_SEARCH_RESULT, SEARCH_DESCRIPTION, SEARCH_NAME,
};

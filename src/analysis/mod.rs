// Tue Jan 13 2026 - Alex

pub mod error;
pub mod pipeline;
pub mod result;

#[cfg(test)]
pub mod fixture;

pub use error::AnalysisError;
pub use pipeline::{analyze, find_prolog, nearest_to, Analyzer, WINDOW_WORDS};
pub use result::AnalyzeResult;

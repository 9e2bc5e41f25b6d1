// Wed Jan 15 2026 - Alex

use crate::interpreter::InterpreterError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Signature {0} not found in RAM")]
    PatternNotFound(&'static str),
    #[error("No stack prolog within {bound:#x} words before {site:#x}")]
    PrologNotFound { site: usize, bound: usize },
    #[error("No candidate survived the {0} stage")]
    NoCandidate(&'static str),
    #[error("Expected {expected} calls in [{start:#x}, {end:#x}], found {found}")]
    CallCountMismatch {
        start: usize,
        end: usize,
        expected: usize,
        found: usize,
    },
    #[error("Candidate rejected: {0}")]
    Rejected(String),
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("Interpreter error: {0}")]
    Interpreter(#[from] InterpreterError),
}

// Tue Jan 15 2026 - Alex

pub mod analysis;
pub mod config;
pub mod engine;
pub mod interpreter;
pub mod locator;
pub mod memory;
pub mod mips;
pub mod pattern;
pub mod utils;
pub mod xref;

pub use analysis::{analyze, AnalysisError, AnalyzeResult};
pub use config::Config;
pub use engine::{PollingWorker, Session, WorkerState};
pub use locator::RamLocator;
pub use memory::{ProcessIntrospection, RamImage};
pub use mips::{decode, encode, Instruction};

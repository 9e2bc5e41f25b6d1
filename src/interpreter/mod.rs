// Wed Jan 15 2026 - Alex

pub mod error;
pub mod machine;
pub mod memory;
pub mod probe;

pub use error::InterpreterError;
pub use machine::Interpreter;
pub use memory::AddressSpace;
pub use probe::{CallProbe, ProbeOutcome};

// Tue Jan 13 2026 - Alex

pub mod session;
pub mod state;
pub mod worker;

pub use session::{LockedRam, Session};
pub use state::WorkerState;
pub use worker::PollingWorker;

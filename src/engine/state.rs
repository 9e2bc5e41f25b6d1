// Thu Jan 16 2026 - Alex

use std::fmt;

/// Phase of the polling loop. Each cycle performs the one action that
/// belongs to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerState {
    Searching = 0,
    LocatingRam = 1,
    Extracting = 2,
}

impl WorkerState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::LocatingRam,
            2 => Self::Extracting,
            _ => Self::Searching,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::Searching
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Searching => "searching",
            Self::LocatingRam => "locating-ram",
            Self::Extracting => "extracting",
        };
        write!(f, "{}", s)
    }
}

// Wed Jan 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a successful discovery pass over one RAM snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    /// Word index of the first word of the verification window.
    pub window_start: usize,
    /// Words found at `window_start` when the result was produced.
    pub window_words: Vec<u32>,
    /// Byte offset of the controller-input word within RAM.
    pub input_offset: u32,
}

impl AnalyzeResult {
    pub fn new(window_start: usize, window_words: Vec<u32>, input_offset: u32) -> Self {
        Self {
            window_start,
            window_words,
            input_offset,
        }
    }

    pub fn window_len(&self) -> usize {
        self.window_words.len()
    }

    /// Byte offset of the verification window within RAM.
    pub fn window_byte_offset(&self) -> u64 {
        self.window_start as u64 * 4
    }

    /// True when `live` still holds the recorded window.
    pub fn verify(&self, live: &[u32]) -> bool {
        live == self.window_words.as_slice()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AnalyzeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input at RAM+{:#x}, window {:#x}..{:#x}",
            self.input_offset,
            self.window_start,
            self.window_start + self.window_words.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let r = AnalyzeResult::new(0x10, vec![1, 2, 3], 0x100010);
        assert!(r.verify(&[1, 2, 3]));
        assert!(!r.verify(&[1, 2, 4]));
        assert!(!r.verify(&[1, 2]));
        assert_eq!(r.window_byte_offset(), 0x40);
    }

    #[test]
    fn test_json_shape() {
        let r = AnalyzeResult::new(0x1500, vec![0x27BDFFD8], 0x100010);
        let json = r.to_json().unwrap();
        assert!(json.contains("\"input_offset\": 1048592"));
        let back: AnalyzeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}

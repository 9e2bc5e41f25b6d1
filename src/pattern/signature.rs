// Tue Jan 13 2026 - Alex

use crate::pattern::MaskedPattern;
use std::fmt;

/// A known routine body. A match may sit some words after the routine's
/// entry point, so each signature lists the candidate entry offsets relative
/// to the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: &'static str,
    pattern: MaskedPattern,
    entry_offsets: Vec<isize>,
}

impl Signature {
    pub fn new(name: &'static str, pattern: MaskedPattern) -> Self {
        Self {
            name,
            pattern,
            entry_offsets: vec![0],
        }
    }

    pub fn with_entry_offsets(mut self, offsets: &[isize]) -> Self {
        self.entry_offsets = offsets.to_vec();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &MaskedPattern {
        &self.pattern
    }

    pub fn entry_offsets(&self) -> &[isize] {
        &self.entry_offsets
    }

    /// Entry candidates for a match at word `at`; ones falling before word 0 are dropped.
    pub fn entries_for(&self, at: usize) -> impl Iterator<Item = usize> + '_ {
        self.entry_offsets
            .iter()
            .filter_map(move |&off| at.checked_add_signed(off))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} words)", self.name, self.pattern.len())
    }
}

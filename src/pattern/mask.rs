// Tue Jan 13 2026 - Alex

use std::fmt;

/// One slot of a masked pattern. Bits under `mask` are free but must not all
/// be zero; every other bit must equal `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskedWord {
    pub value: u32,
    pub mask: u32,
}

impl MaskedWord {
    pub const fn new(value: u32, mask: u32) -> Self {
        Self { value, mask }
    }

    pub const fn literal(value: u32) -> Self {
        Self { value, mask: 0 }
    }

    pub fn matches(&self, word: u32) -> bool {
        if word & !self.mask != self.value {
            return false;
        }
        self.mask == 0 || word & self.mask != 0
    }
}

impl fmt::Display for MaskedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mask == 0 {
            write!(f, "{:08x}", self.value)
        } else {
            write!(f, "{:08x}/{:08x}", self.value, self.mask)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaskedPattern {
    words: Vec<MaskedWord>,
}

impl MaskedPattern {
    pub fn new(words: Vec<MaskedWord>) -> Self {
        Self { words }
    }

    pub fn from_pairs(pairs: &[(u32, u32)]) -> Self {
        Self::new(pairs.iter().map(|&(v, m)| MaskedWord::new(v, m)).collect())
    }

    pub fn literal(values: &[u32]) -> Self {
        Self::new(values.iter().copied().map(MaskedWord::literal).collect())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[MaskedWord] {
        &self.words
    }

    pub fn is_literal(&self) -> bool {
        self.words.iter().all(|w| w.mask == 0)
    }

    /// Tests the window of `image` starting at `start`.
    pub fn matches_at(&self, image: &[u32], start: usize) -> bool {
        let Some(window) = start
            .checked_add(self.words.len())
            .and_then(|end| image.get(start..end))
        else {
            return false;
        };
        self.words.iter().zip(window).all(|(w, &word)| w.matches(word))
    }
}

impl fmt::Display for MaskedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", w)?;
        }
        Ok(())
    }
}

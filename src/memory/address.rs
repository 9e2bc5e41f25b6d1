// Tue Jan 13 2026 - Alex

use std::fmt;
use std::ops::Add;

/// An address in the attached host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    value: u64,
}

impl Address {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn checked_add(&self, rhs: u64) -> Option<Self> {
        self.value.checked_add(rhs).map(Self::new)
    }

    /// Addresses `self, self + step, ...` strictly below `end`.
    pub fn stride(self, end: Address, step: u64) -> impl Iterator<Item = Address> {
        let step = step.max(1);
        std::iter::successors(Some(self), move |a| a.checked_add(step))
            .take_while(move |a| *a < end)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:012x}", self.value)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self {
            value: self.value.wrapping_add(rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride() {
        let start = Address::new(0x1000);
        let all: Vec<u64> = start
            .stride(Address::new(0x4000), 0x1000)
            .map(|a| a.as_u64())
            .collect();
        assert_eq!(all, vec![0x1000, 0x2000, 0x3000]);
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(Address::new(u64::MAX).checked_add(1), None);
        assert_eq!(Address::new(0x10).checked_add(4), Some(Address::new(0x14)));
        assert_eq!(Address::new(u64::MAX) + 2, Address::new(1));
    }
}

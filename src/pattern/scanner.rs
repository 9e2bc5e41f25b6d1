// Tue Jan 13 2026 - Alex

use crate::pattern::{MaskedPattern, Signature};
use rayon::prelude::*;

const PARALLEL_THRESHOLD: usize = 0x4000;

/// Every word offset where `pattern` matches, ascending.
pub fn find_all(image: &[u32], pattern: &MaskedPattern) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > image.len() {
        return Vec::new();
    }
    let last = image.len() - pattern.len();
    if image.len() < PARALLEL_THRESHOLD {
        (0..=last).filter(|&i| pattern.matches_at(image, i)).collect()
    } else {
        (0..=last)
            .into_par_iter()
            .filter(|&i| pattern.matches_at(image, i))
            .collect()
    }
}

/// Every word offset holding exactly `word`, ascending.
pub fn find_word(image: &[u32], word: u32) -> Vec<usize> {
    image
        .par_iter()
        .enumerate()
        .filter(|&(_, &w)| w == word)
        .map(|(i, _)| i)
        .collect()
}

/// Candidate entry points of every match of `signature`, in match order.
pub fn find_entries(image: &[u32], signature: &Signature) -> Vec<usize> {
    find_all(image, signature.pattern())
        .into_iter()
        .flat_map(|at| signature.entries_for(at).collect::<Vec<_>>())
        .collect()
}

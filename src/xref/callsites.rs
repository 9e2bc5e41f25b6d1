// Tue Jan 13 2026 - Alex

use crate::mips::{decode, Kind};
use crate::pattern::{call_to, find_entries, PatternError, Signature};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::ops::Bound;

/// Ordered set of word offsets holding a `jal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSites {
    sites: BTreeSet<usize>,
}

impl CallSites {
    pub fn new(sites: BTreeSet<usize>) -> Self {
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn contains(&self, site: usize) -> bool {
        self.sites.contains(&site)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.sites.iter().copied()
    }

    /// Sites in `[lo, hi]`, both ends inclusive.
    pub fn between(&self, lo: usize, hi: usize) -> impl Iterator<Item = usize> + '_ {
        let hi = hi.max(lo);
        self.sites
            .range((Bound::Included(lo), Bound::Included(hi)))
            .copied()
    }

    pub fn first_between(&self, lo: usize, hi: usize) -> Option<usize> {
        self.between(lo, hi).next()
    }
}

impl FromIterator<usize> for CallSites {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Every `jal` in `image` whose target is one of the word offsets in `targets`.
pub fn find_call_sites_to(image: &[u32], targets: &[usize]) -> Result<CallSites, PatternError> {
    let calls = targets
        .iter()
        .map(|&t| call_to(t))
        .collect::<Result<HashSet<u32>, _>>()?;
    if calls.is_empty() {
        return Ok(CallSites::default());
    }
    let sites: Vec<usize> = image
        .par_iter()
        .enumerate()
        .filter(|&(_, w)| calls.contains(w))
        .map(|(i, _)| i)
        .collect();
    Ok(sites.into_iter().collect())
}

/// Call sites of every entry candidate of `signature`.
pub fn find_call_sites_to_signature(
    image: &[u32],
    signature: &Signature,
) -> Result<CallSites, PatternError> {
    find_call_sites_to(image, &find_entries(image, signature))
}

/// Number of distinct `jal` targets in words `[start, end]`. Undecodable
/// words are skipped.
pub fn count_distinct_calls(image: &[u32], start: usize, end: usize) -> usize {
    let Some(words) = image.get(start..=end.min(image.len().saturating_sub(1))) else {
        return 0;
    };
    words
        .iter()
        .filter_map(|&w| decode(w).ok())
        .filter(|i| i.kind == Kind::Jal)
        .filter_map(|i| i.target)
        .collect::<BTreeSet<u32>>()
        .len()
}

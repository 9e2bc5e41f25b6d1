// Tue Jan 13 2026 - Alex

pub mod callsites;

pub use callsites::{
    count_distinct_calls, find_call_sites_to, find_call_sites_to_signature, CallSites,
};

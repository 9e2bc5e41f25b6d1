// Tue Jan 13 2026 - Alex

pub mod logging;

use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_secs_f64() * 1000.0;
    if millis < 1000.0 {
        format!("{:.2}ms", millis)
    } else {
        format!("{:.2}s", millis / 1000.0)
    }
}

/// Classic hexdump-style word row: `00001500: 27bdffd8 afbf0024 ...`.
pub fn format_word_row(index: usize, words: &[u32]) -> String {
    let mut row = format!("{:08x}:", index * 4);
    for w in words {
        row.push_str(&format!(" {:08x}", w));
    }
    row
}

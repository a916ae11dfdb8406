//! Repeated-phrase detection over 3-character windows.

use std::collections::HashMap;

/// Window width in characters.
pub const WINDOW_CHARS: usize = 3;
/// A window must occur more often than this to be reported.
pub const REPEAT_THRESHOLD: usize = 3;
/// Maximum number of reported phrases.
pub const MAX_RESULTS: usize = 15;

/// One repeated window and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    pub phrase: String,
    pub count: usize,
}

/// Counts every 3-character window (stride 1) across the whole text.
///
/// Windows made only of whitespace are skipped; windows that merely
/// contain a newline are counted. Phrases seen more than
/// `REPEAT_THRESHOLD` times are returned by descending count, ties in
/// first-seen order, capped at `MAX_RESULTS`. `None` means nothing stood
/// out.
pub fn find_repetitions(text: &str) -> Option<Vec<Repetition>> {
    let chars: Vec<char> = text.chars().collect();
    let mut seen: Vec<Repetition> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for window in chars.windows(WINDOW_CHARS) {
        if window.iter().all(|c| c.is_whitespace()) {
            continue;
        }
        let phrase: String = window.iter().collect();
        match slots.get(&phrase) {
            Some(&slot) => seen[slot].count += 1,
            None => {
                slots.insert(phrase.clone(), seen.len());
                seen.push(Repetition { phrase, count: 1 });
            }
        }
    }

    seen.retain(|entry| entry.count > REPEAT_THRESHOLD);
    if seen.is_empty() {
        return None;
    }
    // Vec::sort_by is stable, so equal counts keep first-seen order.
    seen.sort_by(|a, b| b.count.cmp(&a.count));
    seen.truncate(MAX_RESULTS);
    Some(seen)
}

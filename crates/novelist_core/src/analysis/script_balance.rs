//! Logographic / syllabary balance of a text.

use super::AnalysisError;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// CJK unified ideographs (kanji).
pub const LOGOGRAPHIC: RangeInclusive<char> = '\u{4E00}'..='\u{9FFF}';
/// Hiragana block.
pub const FIRST_SYLLABARY: RangeInclusive<char> = '\u{3040}'..='\u{309F}';
/// Katakana block.
pub const SECOND_SYLLABARY: RangeInclusive<char> = '\u{30A0}'..='\u{30FF}';

/// Logographic share (percent) considered balanced.
pub const LOGOGRAPHIC_TARGET: RangeInclusive<f64> = 20.0..=30.0;
/// First-syllabary share (percent) considered balanced.
pub const FIRST_SYLLABARY_TARGET: RangeInclusive<f64> = 60.0..=70.0;

/// Qualitative assessment of one share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Balanced,
    Adjust,
}

impl Verdict {
    fn for_share(percent: f64, target: &RangeInclusive<f64>) -> Self {
        if target.contains(&percent) {
            Self::Balanced
        } else {
            Self::Adjust
        }
    }
}

/// Count of one character class and its share of the trimmed text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptShare {
    pub count: usize,
    pub percent: f64,
}

impl ScriptShare {
    fn of(count: usize, total: usize) -> Self {
        Self {
            count,
            percent: count as f64 / total as f64 * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptBalance {
    pub logographic: ScriptShare,
    pub first_syllabary: ScriptShare,
    pub second_syllabary: ScriptShare,
    /// Character length of the trimmed text.
    pub total: usize,
    pub logographic_verdict: Verdict,
    pub first_syllabary_verdict: Verdict,
}

/// Measures class shares of the trimmed text.
///
/// # Errors
/// - `EmptyInput` when the text is empty or whitespace-only.
pub fn script_balance(text: &str) -> Result<ScriptBalance, AnalysisError> {
    let trimmed = text.trim();
    let total = trimmed.chars().count();
    if total == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let (mut logographic, mut first, mut second) = (0usize, 0usize, 0usize);
    for c in trimmed.chars() {
        if LOGOGRAPHIC.contains(&c) {
            logographic += 1;
        } else if FIRST_SYLLABARY.contains(&c) {
            first += 1;
        } else if SECOND_SYLLABARY.contains(&c) {
            second += 1;
        }
    }

    let logographic = ScriptShare::of(logographic, total);
    let first_syllabary = ScriptShare::of(first, total);
    Ok(ScriptBalance {
        logographic,
        first_syllabary,
        second_syllabary: ScriptShare::of(second, total),
        total,
        logographic_verdict: Verdict::for_share(logographic.percent, &LOGOGRAPHIC_TARGET),
        first_syllabary_verdict: Verdict::for_share(
            first_syllabary.percent,
            &FIRST_SYLLABARY_TARGET,
        ),
    })
}

impl Display for ScriptBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Kanji: {} ({:.1}%)",
            self.logographic.count, self.logographic.percent
        )?;
        writeln!(
            f,
            "Hiragana: {} ({:.1}%)",
            self.first_syllabary.count, self.first_syllabary.percent
        )?;
        writeln!(
            f,
            "Katakana: {} ({:.1}%)",
            self.second_syllabary.count, self.second_syllabary.percent
        )?;
        writeln!(f, "Total: {}", self.total)?;
        writeln!(f, "Kanji share: {}", verdict_text(self.logographic_verdict))?;
        writeln!(
            f,
            "Hiragana share: {}",
            verdict_text(self.first_syllabary_verdict)
        )
    }
}

fn verdict_text(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Balanced => "balanced",
        Verdict::Adjust => "adjust",
    }
}

#[cfg(test)]
mod tests {
    use super::{script_balance, Verdict};
    use crate::analysis::AnalysisError;

    #[test]
    fn whitespace_only_is_empty_input() {
        assert_eq!(script_balance(" \n\t "), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn boundaries_are_inclusive() {
        // 2 kanji + 7 hiragana + 1 ascii = 20% / 70%.
        let balance = script_balance("山川あいうえおかきX").unwrap();
        assert_eq!(balance.total, 10);
        assert_eq!(balance.logographic.count, 2);
        assert_eq!(balance.first_syllabary.count, 7);
        assert_eq!(balance.logographic_verdict, Verdict::Balanced);
        assert_eq!(balance.first_syllabary_verdict, Verdict::Balanced);
    }
}

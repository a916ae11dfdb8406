//! Doubled-punctuation check.

/// Designated comma mark (読点).
pub const COMMA: char = '、';
/// Designated period mark (句点).
pub const PERIOD: char = '。';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctuationIssueKind {
    RepeatedComma,
    RepeatedPeriod,
}

/// One doubled mark, located by 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunctuationIssue {
    pub line: usize,
    pub kind: PunctuationIssueKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PunctuationReport {
    pub comma_count: usize,
    pub period_count: usize,
    pub issues: Vec<PunctuationIssue>,
}

impl PunctuationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Scans adjacent pairs for `、、` and `。。`.
///
/// The line of a match is the number of newlines before its first mark
/// plus one. A run of three marks reports two overlapping pairs.
pub fn punctuation_issues(text: &str) -> PunctuationReport {
    let chars: Vec<char> = text.chars().collect();
    let mut report = PunctuationReport {
        comma_count: chars.iter().filter(|&&c| c == COMMA).count(),
        period_count: chars.iter().filter(|&&c| c == PERIOD).count(),
        issues: Vec::new(),
    };

    let mut line = 1;
    for pair in chars.windows(2) {
        let kind = match (pair[0], pair[1]) {
            (COMMA, COMMA) => Some(PunctuationIssueKind::RepeatedComma),
            (PERIOD, PERIOD) => Some(PunctuationIssueKind::RepeatedPeriod),
            _ => None,
        };
        if let Some(kind) = kind {
            report.issues.push(PunctuationIssue { line, kind });
        }
        if pair[0] == '\n' {
            line += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{punctuation_issues, PunctuationIssueKind};

    #[test]
    fn triple_mark_reports_two_pairs() {
        let report = punctuation_issues("終わり。。。");
        assert_eq!(report.period_count, 3);
        assert_eq!(report.issues.len(), 2);
        assert!(report
            .issues
            .iter()
            .all(|issue| issue.kind == PunctuationIssueKind::RepeatedPeriod));
    }

    #[test]
    fn clean_text_has_no_issues() {
        let report = punctuation_issues("はい、そうです。");
        assert!(report.is_clean());
        assert_eq!(report.comma_count, 1);
        assert_eq!(report.period_count, 1);
    }
}

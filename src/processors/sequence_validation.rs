//! Numbering-sequence validation and OCR error recovery.
//!
//! Question numbers on a page should increase monotonically in reading
//! order. A forward gap means the detector missed a question (or it lives
//! on another page); a reversal usually means the recognizer confused a
//! digit. Both conditions are recorded, never repaired in place: the
//! assembler applies corrections to grouping keys while the boundaries keep
//! their original identifiers for audit.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Digit pairs the recognizer commonly confuses.
///
/// Documented confusions are 1↔9 and 2↔9; 0↔9 is carried as well since
/// reversals like 295 → 204 are only explainable by a 9 read as 0.
const CONFUSABLE_DIGITS: [(char, char); 6] = [
    ('1', '9'),
    ('9', '1'),
    ('2', '9'),
    ('9', '2'),
    ('0', '9'),
    ('9', '0'),
];

/// How far behind the previous number a corrected value may fall and still
/// be plausible (adjacent-column numbering can interleave by one).
const BEHIND_TOLERANCE: u32 = 1;

/// How far ahead of the previous number a corrected value may jump and
/// still be plausible.
const AHEAD_WINDOW: u32 = 10;

/// The kind of a sequence-validation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionKind {
    /// A number missing from a forward gap.
    MissingNumber,
    /// A reversal resolved by a digit-confusion substitution.
    OcrConfusion,
    /// A reversal no substitution could resolve.
    UnresolvedReversal,
}

/// One logged sequence-validation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionLog {
    /// The kind of decision.
    pub kind: CorrectionKind,
    /// Machine-checkable reason string.
    pub message: String,
}

/// The outcome of validating one page's numbering sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Raw identifier → corrected identifier.
    pub ocr_corrections: BTreeMap<String, String>,
    /// Question numbers inferred to be missing. Informational only;
    /// nothing is synthesized into the structure.
    pub recovered_questions: BTreeSet<u32>,
    /// Ordered log of every decision.
    pub logs: Vec<CorrectionLog>,
}

impl CorrectionResult {
    /// True when the sequence was perfectly monotonic.
    pub fn is_empty(&self) -> bool {
        self.ocr_corrections.is_empty()
            && self.recovered_questions.is_empty()
            && self.logs.is_empty()
    }
}

/// Walks the ordered numeric identifiers of a page's question boundaries.
///
/// `identifiers` pairs each raw identifier string with its parsed value, in
/// boundary reading order (ascending y). Total: a monotonic sequence yields
/// an empty result.
pub fn validate_sequence(identifiers: &[(String, u32)]) -> CorrectionResult {
    let mut result = CorrectionResult::default();
    let Some(&(_, first)) = identifiers.first() else {
        return result;
    };

    let mut prev = first;
    for (raw, curr) in identifiers.iter().skip(1) {
        let curr = *curr;
        if curr > prev {
            for missing in prev + 1..curr {
                debug!(missing, "numbering gap");
                result.recovered_questions.insert(missing);
                result.logs.push(CorrectionLog {
                    kind: CorrectionKind::MissingNumber,
                    message: format!("missing_number:{missing}"),
                });
            }
            prev = curr;
        } else if curr < prev {
            match resolve_reversal(raw, prev) {
                Some(corrected) => {
                    debug!(raw = %raw, corrected, "digit confusion resolved");
                    result.logs.push(CorrectionLog {
                        kind: CorrectionKind::OcrConfusion,
                        message: format!("ocr_confusion:{raw}->{corrected}"),
                    });
                    result
                        .ocr_corrections
                        .insert(raw.clone(), corrected.to_string());
                    prev = corrected;
                }
                None => {
                    debug!(raw = %raw, prev, "unresolved numbering reversal");
                    result.logs.push(CorrectionLog {
                        kind: CorrectionKind::UnresolvedReversal,
                        message: format!("unresolved_reversal:{raw}"),
                    });
                }
            }
        }
        // Equal numbers are duplicates (usually a re-detection); neither a
        // gap nor a reversal.
    }

    result
}

/// Tries single-digit confusion substitutions on a reversed identifier.
///
/// A candidate is plausible when it is at most [`BEHIND_TOLERANCE`] behind
/// the previous number and at most [`AHEAD_WINDOW`] ahead of it. The
/// plausible candidate closest to the previous number wins; a tie goes to
/// the smaller value.
fn resolve_reversal(raw: &str, prev: u32) -> Option<u32> {
    let digits: Vec<char> = raw.chars().collect();
    let mut best: Option<(u32, u32)> = None;

    for (position, digit) in digits.iter().enumerate() {
        for (from, to) in CONFUSABLE_DIGITS {
            if *digit != from {
                continue;
            }
            let mut substituted = digits.clone();
            substituted[position] = to;
            let Ok(candidate) = substituted.iter().collect::<String>().parse::<u32>() else {
                continue;
            };
            if candidate + BEHIND_TOLERANCE < prev || candidate > prev + AHEAD_WINDOW {
                continue;
            }
            let distance = candidate.abs_diff(prev);
            let better = match best {
                None => true,
                Some((best_distance, best_candidate)) => {
                    distance < best_distance
                        || (distance == best_distance && candidate < best_candidate)
                }
            };
            if better {
                best = Some((distance, candidate));
            }
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// Convenience wrapper over raw/numeric identifier pairs.
pub fn validate_identifiers<'a, I>(identifiers: I) -> CorrectionResult
where
    I: IntoIterator<Item = &'a str>,
{
    let pairs: Vec<(String, u32)> = identifiers
        .into_iter()
        .filter_map(|raw| raw.parse::<u32>().ok().map(|n| (raw.to_string(), n)))
        .collect_vec();
    validate_sequence(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[&str]) -> Vec<(String, u32)> {
        values
            .iter()
            .map(|v| (v.to_string(), v.parse().unwrap()))
            .collect()
    }

    #[test]
    fn test_monotonic_sequence_is_empty() {
        let result = validate_sequence(&pairs(&["1", "2", "3", "4"]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_forward_gap_records_missing() {
        let result = validate_sequence(&pairs(&["295", "297"]));
        assert_eq!(
            result.recovered_questions,
            BTreeSet::from([296])
        );
        assert_eq!(result.logs.len(), 1);
        assert_eq!(result.logs[0].kind, CorrectionKind::MissingNumber);
        assert_eq!(result.logs[0].message, "missing_number:296");
    }

    #[test]
    fn test_wide_gap_records_every_missing_number() {
        let result = validate_sequence(&pairs(&["1", "5"]));
        assert_eq!(result.recovered_questions, BTreeSet::from([2, 3, 4]));
    }

    #[test]
    fn test_reversal_resolved_by_digit_confusion() {
        let result = validate_sequence(&pairs(&["295", "204"]));
        assert_eq!(
            result.ocr_corrections,
            BTreeMap::from([("204".to_string(), "294".to_string())])
        );
        assert_eq!(result.logs.len(), 1);
        assert_eq!(result.logs[0].kind, CorrectionKind::OcrConfusion);
        assert_eq!(result.logs[0].message, "ocr_confusion:204->294");
        assert!(result.recovered_questions.is_empty());
    }

    #[test]
    fn test_reversal_with_one_nine_confusion() {
        // 19 misread as 11.
        let result = validate_sequence(&pairs(&["18", "11"]));
        assert_eq!(
            result.ocr_corrections,
            BTreeMap::from([("11".to_string(), "19".to_string())])
        );
    }

    #[test]
    fn test_unresolvable_reversal_is_logged() {
        // No confusable substitution in "3" can reach the 7..=18 window.
        let result = validate_sequence(&pairs(&["8", "3"]));
        assert!(result.ocr_corrections.is_empty());
        assert_eq!(result.logs.len(), 1);
        assert_eq!(result.logs[0].kind, CorrectionKind::UnresolvedReversal);
        assert_eq!(result.logs[0].message, "unresolved_reversal:3");
    }

    #[test]
    fn test_correction_feeds_following_comparison() {
        // After correcting 204 -> 294, the next number is compared against
        // 294, so 296 opens a one-number gap.
        let result = validate_sequence(&pairs(&["295", "204", "296"]));
        assert_eq!(
            result.ocr_corrections,
            BTreeMap::from([("204".to_string(), "294".to_string())])
        );
        assert_eq!(result.recovered_questions, BTreeSet::from([295]));
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let result = validate_sequence(&pairs(&["5", "5", "6"]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_and_single_inputs() {
        assert!(validate_sequence(&[]).is_empty());
        assert!(validate_sequence(&pairs(&["42"])).is_empty());
    }

    #[test]
    fn test_validate_identifiers_skips_non_numeric() {
        let result = validate_identifiers(["295", "서술형", "297"]);
        assert_eq!(result.recovered_questions, BTreeSet::from([296]));
    }
}

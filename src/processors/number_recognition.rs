//! Question-number recognition over noisy OCR text.
//!
//! Recognized text on numbering marks arrives with OCR artifacts: repeated
//! or spaced-out dots, stray whitespace, and occasional scoring annotations
//! misdetected as numbers. This module cleans the text, matches it against
//! a tiered table of numbering patterns, and combines the pattern score
//! with the upstream detector and recognition confidences into a single
//! acceptance decision.

use crate::core::config::StructureConfig;
use once_cell::sync::Lazy;
use regex::Regex;

/// Weight of the detector confidence in the combined score.
const DETECTOR_WEIGHT: f32 = 0.5;
/// Weight of the recognition confidence in the combined score.
const RECOGNITION_WEIGHT: f32 = 0.3;
/// Weight of the pattern score in the combined score.
const PATTERN_WEIGHT: f32 = 0.2;

/// Score for canonical exact forms.
const TIER1_SCORE: f32 = 1.0;
/// Score for Q-prefixed forms.
const TIER2_SCORE: f32 = 0.9;
/// Score for canonical forms with collapsed trailing noise.
const TIER3_SCORE: f32 = 0.8;
/// Score for bare numerals (densely numbered documents only).
const TIER4_SCORE: f32 = 0.6;

/// A run of dots (possibly interleaved with whitespace) after a numeral.
static DIGIT_DOT_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d)(?:\s*\.)+")
        .unwrap_or_else(|e| panic!("Invalid digit-dot regex: {e}"))
});

/// Any remaining run of two or more consecutive dots.
static MULTI_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{2,}").unwrap_or_else(|e| panic!("Invalid multi-dot regex: {e}")));

/// A run of whitespace.
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("Invalid whitespace regex: {e}")));

/// Dot noise: two dots possibly separated by whitespace, or whitespace
/// between a numeral and its dot. Presence demotes a dot-form match from
/// tier 1 to tier 3.
static DOT_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.[\s.]*\.|\d\s+\.")
        .unwrap_or_else(|e| panic!("Invalid dot-noise regex: {e}"))
});

/// Tier 1: canonical exact numbering forms.
static TIER1_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(\d{1,3})번$",
        r"^(\d{1,3})\.$",
        r"^문제\s?(\d{1,3})$",
        r"^(\d{1,3})[)）]$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("Invalid tier-1 regex: {e}")))
    .collect()
});

/// Index of the `<n>.` form within [`TIER1_PATTERNS`]; the only form that
/// dot noise can counterfeit.
const TIER1_DOT_FORM: usize = 1;

/// Tier 2: Q-prefixed forms.
static TIER2_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[Qq]\s?(\d{1,3})$").unwrap_or_else(|e| panic!("Invalid tier-2 regex: {e}"))
});

/// Tier 3: canonical marker with trailing noise the cleaner left behind.
static TIER3_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\s?[번.)）][\s.·~\-*)）]*$")
        .unwrap_or_else(|e| panic!("Invalid tier-3 regex: {e}"))
});

/// Tier 4: bare 2-3 digit numeral with no surrounding marker.
static TIER4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,3})$").unwrap_or_else(|e| panic!("Invalid tier-4 regex: {e}"))
});

/// Tokens marking an answer or scoring annotation. A numeral next to one of
/// these is an annotation, never a question number.
const ANNOTATION_TOKENS: [&str; 5] = ["정답", "배점", "해설", "점", "답"];

/// Result of cleaning one piece of recognized text.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedText {
    /// The cleaned text.
    pub text: String,
    /// Whether the cleaner collapsed dot noise around a numeral.
    pub dot_noise: bool,
}

/// A successfully extracted question number.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberMatch {
    /// The bare numeric identifier.
    pub identifier: String,
    /// Score of the pattern tier that matched.
    pub pattern_score: f32,
    /// Weighted combination of detector, recognition, and pattern scores.
    pub combined_confidence: f32,
}

/// Extracts question numbers from noisy OCR text.
#[derive(Debug, Clone)]
pub struct NumberRecognizer {
    acceptance_threshold: f32,
    allow_bare_numerals: bool,
}

impl NumberRecognizer {
    /// Creates a recognizer from the pipeline configuration.
    pub fn new(config: &StructureConfig) -> Self {
        Self {
            acceptance_threshold: config.acceptance_threshold,
            allow_bare_numerals: config.allow_bare_numerals,
        }
    }

    /// Normalizes OCR artifacts in recognized text.
    ///
    /// Trims, collapses any interleaving of whitespace and dots after a
    /// numeral into a single trailing dot, collapses remaining multi-dot
    /// runs, and collapses whitespace runs into one space. Empty input
    /// yields the empty string.
    pub fn clean(raw: &str) -> CleanedText {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CleanedText {
                text: String::new(),
                dot_noise: false,
            };
        }

        let dot_noise = DOT_NOISE.is_match(trimmed);
        let step = DIGIT_DOT_RUN.replace_all(trimmed, "$1.");
        let step = MULTI_DOT.replace_all(&step, ".");
        let step = WHITESPACE_RUN.replace_all(&step, " ");

        CleanedText {
            text: step.trim().to_string(),
            dot_noise,
        }
    }

    /// The weighted acceptance confidence.
    ///
    /// A weighted average rather than a product: a product over-penalizes
    /// valid matches where only one signal is weak. The weights sum to 1,
    /// so equal inputs pass through unchanged.
    pub fn combined_confidence(
        detector_confidence: f32,
        recognition_confidence: f32,
        pattern_score: f32,
    ) -> f32 {
        DETECTOR_WEIGHT * detector_confidence
            + RECOGNITION_WEIGHT * recognition_confidence
            + PATTERN_WEIGHT * pattern_score
    }

    /// Matches the cleaned text against the pattern tiers, strictly in
    /// order, first match wins.
    fn match_tiers(&self, cleaned: &CleanedText) -> Option<(String, f32)> {
        for (idx, pattern) in TIER1_PATTERNS.iter().enumerate() {
            if let Some(caps) = pattern.captures(&cleaned.text) {
                let identifier = caps[1].to_string();
                // Dot noise means the canonical dot form was reconstructed
                // by the cleaner, not observed; that is a tier-3 match.
                let score = if idx == TIER1_DOT_FORM && cleaned.dot_noise {
                    TIER3_SCORE
                } else {
                    TIER1_SCORE
                };
                return Some((identifier, score));
            }
        }

        if let Some(caps) = TIER2_PATTERN.captures(&cleaned.text) {
            return Some((caps[1].to_string(), TIER2_SCORE));
        }

        if let Some(caps) = TIER3_PATTERN.captures(&cleaned.text) {
            return Some((caps[1].to_string(), TIER3_SCORE));
        }

        if self.allow_bare_numerals
            && let Some(caps) = TIER4_PATTERN.captures(&cleaned.text)
        {
            return Some((caps[1].to_string(), TIER4_SCORE));
        }

        None
    }

    /// Extracts a question number from raw recognized text.
    ///
    /// Returns `None` when no pattern matches, when the text carries an
    /// answer/score annotation, or when the combined confidence falls
    /// below the acceptance threshold. There is no exception path.
    pub fn extract(
        &self,
        raw_text: &str,
        detector_confidence: f32,
        recognition_confidence: f32,
    ) -> Option<NumberMatch> {
        let cleaned = Self::clean(raw_text);
        if cleaned.text.is_empty() {
            return None;
        }

        // Annotation guard: scoring marks like "정답 299점" contain a
        // numeral but must never become a boundary.
        if ANNOTATION_TOKENS
            .iter()
            .any(|token| cleaned.text.contains(token))
        {
            return None;
        }

        let (identifier, pattern_score) = self.match_tiers(&cleaned)?;
        let combined =
            Self::combined_confidence(detector_confidence, recognition_confidence, pattern_score);
        if combined < self.acceptance_threshold {
            return None;
        }

        Some(NumberMatch {
            identifier,
            pattern_score,
            combined_confidence: combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> NumberRecognizer {
        NumberRecognizer::new(&StructureConfig::default())
    }

    #[test]
    fn test_clean_collapses_dot_runs() {
        let cleaned = NumberRecognizer::clean("299...");
        assert_eq!(cleaned.text, "299.");
        assert!(cleaned.dot_noise);

        let cleaned = NumberRecognizer::clean("299 . . .");
        assert_eq!(cleaned.text, "299.");
        assert!(cleaned.dot_noise);
    }

    #[test]
    fn test_clean_plain_text() {
        let cleaned = NumberRecognizer::clean("  1번 ");
        assert_eq!(cleaned.text, "1번");
        assert!(!cleaned.dot_noise);

        let cleaned = NumberRecognizer::clean("문제   3");
        assert_eq!(cleaned.text, "문제 3");
        assert!(!cleaned.dot_noise);

        assert_eq!(NumberRecognizer::clean("").text, "");
        assert_eq!(NumberRecognizer::clean("   ").text, "");
    }

    #[test]
    fn test_tier1_exact_forms() {
        let rec = recognizer();
        for raw in ["1번", "1.", "문제 1", "1)"] {
            let m = rec.extract(raw, 1.0, 1.0).unwrap();
            assert_eq!(m.identifier, "1", "raw: {raw}");
            assert_eq!(m.pattern_score, 1.0, "raw: {raw}");
        }
    }

    #[test]
    fn test_tier2_q_forms() {
        let rec = recognizer();
        for raw in ["Q1", "Q 1", "q7"] {
            let m = rec.extract(raw, 1.0, 1.0).unwrap();
            assert_eq!(m.pattern_score, 0.9, "raw: {raw}");
        }
        assert_eq!(rec.extract("Q 1", 1.0, 1.0).unwrap().identifier, "1");
    }

    #[test]
    fn test_tier3_noisy_dot_form() {
        let rec = recognizer();
        let m = rec.extract("299...", 1.0, 1.0).unwrap();
        assert_eq!(m.identifier, "299");
        assert_eq!(m.pattern_score, 0.8);

        // Trailing noise after a marker also lands in tier 3.
        let m = rec.extract("12번..", 1.0, 1.0).unwrap();
        assert_eq!(m.identifier, "12");
        assert_eq!(m.pattern_score, 0.8);
    }

    #[test]
    fn test_annotation_guard_rejects() {
        let rec = recognizer();
        assert!(rec.extract("정답 299점", 1.0, 1.0).is_none());
        assert!(rec.extract("배점 5점", 1.0, 1.0).is_none());
    }

    #[test]
    fn test_bare_numerals_gated_by_config() {
        let rec = recognizer();
        assert!(rec.extract("42", 1.0, 1.0).is_none());

        let config = StructureConfig {
            allow_bare_numerals: true,
            ..Default::default()
        };
        let rec = NumberRecognizer::new(&config);
        let m = rec.extract("42", 1.0, 1.0).unwrap();
        assert_eq!(m.identifier, "42");
        assert_eq!(m.pattern_score, 0.6);

        // Single digits are too ambiguous even for the bare tier.
        assert!(rec.extract("7", 1.0, 1.0).is_none());
    }

    #[test]
    fn test_combined_confidence_identity() {
        // Weights sum to 1, so equal signals pass through unchanged.
        for x in [0.0, 0.25, 0.5, 0.7, 1.0] {
            let combined = NumberRecognizer::combined_confidence(x, x, x);
            assert!((combined - x).abs() < 1e-6, "x = {x}");
        }
    }

    #[test]
    fn test_acceptance_threshold() {
        let rec = recognizer();
        // 0.5*0.95 + 0.3*0.9 + 0.2*1.0 = 0.945
        assert!(rec.extract("1번", 0.95, 0.9).is_some());
        // 0.5*0.5 + 0.3*0.5 + 0.2*1.0 = 0.60 < 0.70
        assert!(rec.extract("1번", 0.5, 0.5).is_none());
    }
}

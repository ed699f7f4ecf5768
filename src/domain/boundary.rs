//! Question boundary types.
//!
//! A boundary is an accepted numbering mark on the page: the anchor every
//! other region is assigned to. Boundaries are created by the extraction
//! and number-recognition stages and are read-only afterwards; identifier
//! corrections apply only to the grouping key, never to the boundary.

use crate::processors::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The kind of numbering mark a boundary represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryType {
    /// A main question number (e.g. "17번").
    QuestionNumber,
    /// A sub-question number within a main question (e.g. "1)").
    SubQuestionNumber,
    /// A question-type section header (e.g. "서술형").
    QuestionType,
}

/// An accepted question-numbering mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBoundary {
    /// Extracted identifier, pre-correction (e.g. "17").
    pub identifier: String,
    /// The kind of mark.
    pub boundary_type: BoundaryType,
    /// Origin (top-left) of the source region's box.
    pub position: Point,
    /// Width and height of the source region's box.
    pub size: (f32, f32),
    /// Id of the region this boundary was extracted from.
    pub source_region_id: u32,
    /// The region's recognized text, trimmed only.
    pub raw_text: Arc<str>,
    /// Score of the pattern tier that matched.
    pub pattern_score: f32,
    /// Weighted combination of detector, recognition, and pattern scores.
    pub combined_confidence: f32,
}

impl QuestionBoundary {
    /// The identifier parsed as an integer, if it is numeric.
    pub fn numeric_identifier(&self) -> Option<u32> {
        self.identifier.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_identifier() {
        let boundary = QuestionBoundary {
            identifier: "17".to_string(),
            boundary_type: BoundaryType::QuestionNumber,
            position: Point::new(100.0, 200.0),
            size: (40.0, 20.0),
            source_region_id: 3,
            raw_text: "17번".into(),
            pattern_score: 1.0,
            combined_confidence: 0.9,
        };
        assert_eq!(boundary.numeric_identifier(), Some(17));

        let typed = QuestionBoundary {
            identifier: "서술형".to_string(),
            boundary_type: BoundaryType::QuestionType,
            ..boundary
        };
        assert_eq!(typed.numeric_identifier(), None);
    }
}

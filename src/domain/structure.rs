//! Structured-document result types.
//!
//! These types carry the final output of one page-level analysis: question
//! groups with categorized member regions, the detected column layout, the
//! sequence corrections that were applied to grouping keys, and any
//! data-quality warnings raised along the way.

use crate::domain::boundary::QuestionBoundary;
use crate::domain::region::Region;
use crate::processors::column_detect::ColumnRange;
use crate::processors::sequence_validation::CorrectionResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Semantic category of a region within its question group.
///
/// The derived `Ord` gives the category map a stable iteration order, which
/// keeps serialized output deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RegionCategory {
    /// Prompt text of the question.
    QuestionText,
    /// A passage the question refers to.
    Passage,
    /// An answer choice.
    Choice,
    /// A figure, image, chart, or diagram.
    Figure,
    /// A table.
    Table,
    /// A mathematical formula.
    Formula,
    /// An explanation or solution block.
    Explanation,
}

impl RegionCategory {
    /// Returns the string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionCategory::QuestionText => "question_text",
            RegionCategory::Passage => "passage",
            RegionCategory::Choice => "choice",
            RegionCategory::Figure => "figure",
            RegionCategory::Table => "table",
            RegionCategory::Formula => "formula",
            RegionCategory::Explanation => "explanation",
        }
    }
}

/// One numbered question with its categorized member regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionGroup {
    /// Final (corrected) question identifier used as the grouping key.
    pub question_number: String,
    /// Index of the column this question's boundary sits in.
    pub column_index: usize,
    /// The boundary that anchors this group (identifier pre-correction,
    /// retained for audit).
    pub boundary: QuestionBoundary,
    /// Member regions keyed by semantic category. Only observed categories
    /// appear; there are no empty placeholders.
    pub categories: BTreeMap<RegionCategory, Vec<Region>>,
    /// Regions belonging to sub-questions, keyed by sub-identifier.
    pub sub_questions: BTreeMap<String, Vec<Region>>,
    /// Question-type label attached to this group, if a type header was
    /// detected nearby.
    pub question_type: Option<Arc<str>>,
    /// Total member regions across all categories and sub-questions.
    pub region_count: usize,
    /// Vertical extent (min y, max y) of the boundary and its members.
    pub y_range: (f32, f32),
}

/// Derived label describing the overall page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutType {
    /// No question boundaries were found.
    Empty,
    /// Two or fewer questions on a single column.
    Simple,
    /// More than one column.
    MultiColumn,
    /// Many questions on a single column.
    Dense,
    /// Everything else.
    Standard,
}

impl LayoutType {
    /// Returns the string representation of the layout label.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Empty => "empty",
            LayoutType::Simple => "simple",
            LayoutType::MultiColumn => "multi_column",
            LayoutType::Dense => "dense",
            LayoutType::Standard => "standard",
        }
    }
}

/// A non-fatal data-quality condition encountered during analysis.
///
/// These never abort the transformation; affected regions are excluded and
/// the condition is surfaced for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataQualityWarning {
    /// A region's box had non-positive or non-finite dimensions.
    MalformedBox {
        /// Id of the excluded region.
        region_id: u32,
    },
    /// A numbering-class region carried no recognized text.
    MissingNumberText {
        /// Id of the skipped region.
        region_id: u32,
    },
    /// The page had no regions at all.
    EmptyPage,
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityWarning::MalformedBox { region_id } => {
                write!(f, "malformed box on region {}", region_id)
            }
            DataQualityWarning::MissingNumberText { region_id } => {
                write!(f, "numbering region {} has no text", region_id)
            }
            DataQualityWarning::EmptyPage => write!(f, "page has no regions"),
        }
    }
}

/// The reconstructed logical structure of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Number of question groups on the page.
    pub total_questions: usize,
    /// Derived layout label.
    pub layout_type: LayoutType,
    /// Question groups in column-major reading order.
    pub questions: Vec<QuestionGroup>,
    /// Regions that could not be assigned to any boundary.
    pub unassigned_regions: Vec<Region>,
    /// The detected column partition of the page.
    pub columns: Vec<ColumnRange>,
    /// Sequence-validation outcome for this page.
    pub corrections: CorrectionResult,
    /// Data-quality conditions encountered during analysis.
    pub warnings: Vec<DataQualityWarning>,
}

impl StructuredDocument {
    /// Converts the result to a JSON value.
    ///
    /// Serialization of the result into a persisted or transmitted format
    /// is the caller's concern; this is provided as a convenience.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_is_stable() {
        // The map key order drives serialized output; it must not change
        // between runs.
        let mut map: BTreeMap<RegionCategory, Vec<u32>> = BTreeMap::new();
        map.insert(RegionCategory::Explanation, vec![]);
        map.insert(RegionCategory::QuestionText, vec![]);
        map.insert(RegionCategory::Choice, vec![]);
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                RegionCategory::QuestionText,
                RegionCategory::Choice,
                RegionCategory::Explanation,
            ]
        );
    }

    #[test]
    fn test_layout_labels() {
        assert_eq!(LayoutType::Empty.as_str(), "empty");
        assert_eq!(LayoutType::MultiColumn.as_str(), "multi_column");
    }

    #[test]
    fn test_warning_display() {
        let warning = DataQualityWarning::MalformedBox { region_id: 7 };
        assert_eq!(warning.to_string(), "malformed box on region 7");
    }
}

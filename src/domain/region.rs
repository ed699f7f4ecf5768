//! Detected page regions as produced by the upstream layout detector.

use crate::processors::BoundingBox;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A detected layout region on one page.
///
/// Regions are produced by the out-of-scope detector/recognizer/description
/// collaborators and are immutable once constructed: analysis never writes
/// back into a region. The recognized text and generated description are
/// independent optional signals with their own confidences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Opaque identifier, stable within one page.
    pub id: u32,
    /// Free-form layout label from the detector (e.g. "figure", "text",
    /// "question_number").
    pub class_name: String,
    /// The region's bounding box in page coordinates.
    pub bbox: BoundingBox,
    /// Detector confidence in [0, 1].
    pub detector_confidence: f32,
    /// Recognized text, if the recognition service processed this region.
    pub recognized_text: Option<Arc<str>>,
    /// Confidence of the recognized text.
    pub recognition_confidence: Option<f32>,
    /// Natural-language description, if the vision-description service
    /// processed this region.
    pub generated_description: Option<Arc<str>>,
    /// Confidence of the generated description.
    pub description_confidence: Option<f32>,
}

impl Region {
    /// Creates a region with neither text nor description attached.
    pub fn new(
        id: u32,
        class_name: impl Into<String>,
        bbox: BoundingBox,
        detector_confidence: f32,
    ) -> Self {
        Self {
            id,
            class_name: class_name.into(),
            bbox,
            detector_confidence,
            recognized_text: None,
            recognition_confidence: None,
            generated_description: None,
            description_confidence: None,
        }
    }

    /// Attaches recognized text and its confidence.
    pub fn with_text(mut self, text: impl Into<Arc<str>>, confidence: f32) -> Self {
        self.recognized_text = Some(text.into());
        self.recognition_confidence = Some(confidence);
        self
    }

    /// Attaches a generated description and its confidence.
    pub fn with_description(mut self, description: impl Into<Arc<str>>, confidence: f32) -> Self {
        self.generated_description = Some(description.into());
        self.description_confidence = Some(confidence);
        self
    }

    /// Returns true if this region carries non-empty recognized text.
    pub fn has_text(&self) -> bool {
        self.recognized_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// The typed class of this region's free-form label.
    pub fn class(&self) -> RegionClass {
        RegionClass::from_label(&self.class_name)
    }

    /// The text content representing this region.
    ///
    /// Visual classes prefer the generated description and fall back to
    /// recognized text; textual classes use recognized text exclusively
    /// (a description, if present, is ignored for them).
    pub fn content_text(&self) -> Option<&str> {
        if self.class().is_visual() {
            self.generated_description
                .as_deref()
                .or(self.recognized_text.as_deref())
        } else {
            self.recognized_text.as_deref()
        }
    }
}

/// Typed layout class mapped from the detector's free-form label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionClass {
    /// Main question numbering mark.
    QuestionNumber,
    /// Sub-question numbering mark.
    SubQuestionNumber,
    /// Question-type section header.
    QuestionType,
    /// General text content.
    Text,
    /// List content.
    List,
    /// Figure or image.
    Figure,
    /// Table.
    Table,
    /// Chart or graph.
    Chart,
    /// Flowchart or diagram.
    Flowchart,
    /// Mathematical formula.
    Formula,
    /// Unknown/unmapped labels (the original label is preserved on the
    /// region).
    Other,
}

impl RegionClass {
    /// Maps a free-form detector label to its typed class.
    ///
    /// Only the underscore spellings of the numbering labels are accepted;
    /// the legacy hyphen-separated spellings of the same concepts are stale
    /// detector output and deliberately map to [`RegionClass::Other`] so
    /// they can never form a boundary.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "question_number" => RegionClass::QuestionNumber,
            "sub_question_number" => RegionClass::SubQuestionNumber,
            "question_type" => RegionClass::QuestionType,

            // Legacy labeling convention, rejected as a numbering mark.
            "question-number" | "sub-question-number" | "question-type" => RegionClass::Other,

            "text" | "paragraph" | "plain_text" => RegionClass::Text,
            "list" | "list_item" => RegionClass::List,
            "figure" | "image" => RegionClass::Figure,
            "table" => RegionClass::Table,
            "chart" => RegionClass::Chart,
            "flowchart" | "diagram" => RegionClass::Flowchart,
            "formula" | "equation" => RegionClass::Formula,

            _ => RegionClass::Other,
        }
    }

    /// Returns the string representation of the class.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionClass::QuestionNumber => "question_number",
            RegionClass::SubQuestionNumber => "sub_question_number",
            RegionClass::QuestionType => "question_type",
            RegionClass::Text => "text",
            RegionClass::List => "list",
            RegionClass::Figure => "figure",
            RegionClass::Table => "table",
            RegionClass::Chart => "chart",
            RegionClass::Flowchart => "flowchart",
            RegionClass::Formula => "formula",
            RegionClass::Other => "other",
        }
    }

    /// Whether this class marks a question or sub-question number or a
    /// question-type header.
    pub fn is_numbering(&self) -> bool {
        matches!(
            self,
            RegionClass::QuestionNumber
                | RegionClass::SubQuestionNumber
                | RegionClass::QuestionType
        )
    }

    /// Whether this class carries primarily visual content, so that a
    /// generated description represents it better than recognized text.
    pub fn is_visual(&self) -> bool {
        matches!(
            self,
            RegionClass::Figure | RegionClass::Table | RegionClass::Chart | RegionClass::Flowchart
        )
    }

    /// Whether this class typically spans a large page area, warranting the
    /// wider assignment threshold.
    pub fn is_large_format(&self) -> bool {
        matches!(
            self,
            RegionClass::Figure | RegionClass::Table | RegionClass::Formula | RegionClass::Flowchart
        )
    }
}

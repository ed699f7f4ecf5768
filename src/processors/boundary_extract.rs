//! Boundary extraction: filtering regions down to numbering marks.
//!
//! Only regions whose layout class is one of the whitelisted numbering
//! labels can become question boundaries. The raw text is trimmed here and
//! nothing else; all further cleanup belongs to the number recognizer.

use crate::domain::boundary::BoundaryType;
use crate::domain::region::{Region, RegionClass};
use crate::domain::structure::DataQualityWarning;
use crate::processors::Point;
use std::sync::Arc;
use tracing::{debug, warn};

/// Legacy spellings of the numbering labels, rejected as stale detector
/// output.
const LEGACY_NUMBERING_LABELS: [&str; 3] =
    ["question-number", "sub-question-number", "question-type"];

/// A numbering mark awaiting number recognition.
///
/// The identifier is provisionally the trimmed raw text; the number
/// recognizer replaces it with the extracted numeral (or discards the
/// candidate).
#[derive(Debug, Clone)]
pub struct BoundaryCandidate {
    /// The kind of numbering mark.
    pub boundary_type: BoundaryType,
    /// Origin (top-left) of the source region's box.
    pub position: Point,
    /// Width and height of the source region's box.
    pub size: (f32, f32),
    /// Id of the source region.
    pub source_region_id: u32,
    /// The region's recognized text, trimmed only.
    pub raw_text: Arc<str>,
    /// Detector confidence of the source region.
    pub detector_confidence: f32,
    /// Recognition confidence of the source region, if present.
    pub recognition_confidence: Option<f32>,
}

/// Filters regions to numbering-mark candidates, sorted by y ascending.
///
/// Regions without recognized text are skipped with a data-quality warning.
/// Never fails.
pub fn extract_candidates(
    regions: &[Region],
) -> (Vec<BoundaryCandidate>, Vec<DataQualityWarning>) {
    let mut candidates = Vec::new();
    let mut warnings = Vec::new();

    for region in regions {
        let normalized = region.class_name.trim().to_lowercase();
        if LEGACY_NUMBERING_LABELS.contains(&normalized.as_str()) {
            debug!(
                region_id = region.id,
                label = %region.class_name,
                "rejecting legacy numbering label"
            );
            continue;
        }

        let boundary_type = match region.class() {
            RegionClass::QuestionNumber => BoundaryType::QuestionNumber,
            RegionClass::SubQuestionNumber => BoundaryType::SubQuestionNumber,
            RegionClass::QuestionType => BoundaryType::QuestionType,
            _ => continue,
        };

        let Some(text) = region.recognized_text.as_deref() else {
            warn!(region_id = region.id, "numbering region has no text");
            warnings.push(DataQualityWarning::MissingNumberText {
                region_id: region.id,
            });
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            warn!(region_id = region.id, "numbering region has empty text");
            warnings.push(DataQualityWarning::MissingNumberText {
                region_id: region.id,
            });
            continue;
        }

        candidates.push(BoundaryCandidate {
            boundary_type,
            position: region.bbox.origin(),
            size: (region.bbox.width, region.bbox.height),
            source_region_id: region.id,
            raw_text: trimmed.into(),
            detector_confidence: region.detector_confidence,
            recognition_confidence: region.recognition_confidence,
        });
    }

    // Reading order is top-to-bottom; x and id break exact ties so the
    // output is deterministic.
    candidates.sort_by(|a, b| {
        a.position
            .y
            .partial_cmp(&b.position.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.position
                    .x
                    .partial_cmp(&b.position.x)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(a.source_region_id.cmp(&b.source_region_id))
    });

    debug!(
        candidates = candidates.len(),
        skipped = warnings.len(),
        "extracted boundary candidates"
    );

    (candidates, warnings)
}

//! Page-level orchestration of the analysis stages.
//!
//! [`StructureAnalyzer`] wires the six stages together over one page
//! snapshot. The whole run is a pure transformation: identical inputs
//! always produce identical output, including tie-break order. Per-region
//! assignment is parallelized with rayon; the order-preserving collect
//! keeps the result deterministic.

use crate::core::StructResult;
use crate::core::config::StructureConfig;
use crate::domain::boundary::{BoundaryType, QuestionBoundary};
use crate::domain::region::Region;
use crate::domain::structure::{DataQualityWarning, StructuredDocument};
use crate::processors::assembler::assemble;
use crate::processors::boundary_extract::{BoundaryCandidate, extract_candidates};
use crate::processors::column_detect::detect_columns;
use crate::processors::number_recognition::NumberRecognizer;
use crate::processors::sequence_validation::{CorrectionResult, validate_identifiers};
use crate::processors::spatial_assign::{AssignedBoundary, SpatialAssigner};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// The in-memory snapshot of one page handed to the analyzer.
#[derive(Debug, Clone)]
pub struct PageInput {
    /// All detected regions of the page.
    pub regions: Vec<Region>,
    /// Page width in the same units as the region boxes.
    pub page_width: f32,
    /// Page height in the same units as the region boxes.
    pub page_height: f32,
}

impl PageInput {
    /// Creates a page snapshot.
    pub fn new(regions: Vec<Region>, page_width: f32, page_height: f32) -> Self {
        Self {
            regions,
            page_width,
            page_height,
        }
    }
}

/// Reconstructs the logical question structure of scanned pages.
///
/// One analyzer can process any number of pages; it holds only the
/// validated configuration and no per-page state, so pages may be analyzed
/// concurrently from multiple threads.
#[derive(Debug, Clone)]
pub struct StructureAnalyzer {
    config: StructureConfig,
}

impl StructureAnalyzer {
    /// Creates an analyzer, validating the configuration once.
    pub fn new(config: StructureConfig) -> StructResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The analyzer's configuration.
    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Analyzes one page and returns its reconstructed structure.
    ///
    /// Total over its input: malformed regions are excluded with warnings,
    /// ambiguous structure falls back conservatively, and a page without
    /// boundaries yields an empty-layout document.
    pub fn analyze(&self, page: &PageInput) -> StructuredDocument {
        let mut warnings = Vec::new();
        if page.regions.is_empty() {
            warnings.push(DataQualityWarning::EmptyPage);
        }

        let usable: Vec<Region> = page
            .regions
            .iter()
            .filter(|region| {
                if region.bbox.is_valid() {
                    true
                } else {
                    warn!(region_id = region.id, "excluding region with malformed box");
                    warnings.push(DataQualityWarning::MalformedBox {
                        region_id: region.id,
                    });
                    false
                }
            })
            .cloned()
            .collect();

        // Stage 1: numbering-mark candidates, y-sorted.
        let (candidates, mut extraction_warnings) = extract_candidates(&usable);
        warnings.append(&mut extraction_warnings);

        // Stage 2: number recognition and confidence filtering.
        let recognizer = NumberRecognizer::new(&self.config);
        let (boundaries, type_headers) = self.score_candidates(&recognizer, candidates);
        debug!(
            boundaries = boundaries.len(),
            type_headers = type_headers.len(),
            "accepted boundaries"
        );

        // Stage 3: sequence validation over main question numbers in
        // reading order.
        let corrections: CorrectionResult = validate_identifiers(
            boundaries
                .iter()
                .filter(|b| b.boundary_type == BoundaryType::QuestionNumber)
                .map(|b| b.identifier.as_str()),
        );

        // Stage 4: column layout from accepted boundary positions.
        let xs: Vec<f32> = boundaries.iter().map(|b| b.position.x).collect();
        let columns = detect_columns(&xs, page.page_width, &self.config);

        // Stage 5: spatial assignment of every non-boundary region. Each
        // assignment only reads the fixed boundary list, so the regions
        // are processed in parallel.
        let source_ids: HashSet<u32> = boundaries
            .iter()
            .chain(type_headers.iter())
            .map(|b| b.source_region_id)
            .collect();
        let assignable: Vec<Region> = usable
            .into_iter()
            .filter(|region| !source_ids.contains(&region.id))
            .collect();
        let assigner = SpatialAssigner::new(&boundaries, &columns, &self.config);
        let assignments: Vec<Option<AssignedBoundary>> = assignable
            .par_iter()
            .map(|region| assigner.assign(region))
            .collect();

        // Stage 6: classification, grouping, and column-major ordering.
        assemble(
            &boundaries,
            &type_headers,
            &assignable,
            &assignments,
            &columns,
            &corrections,
            warnings,
            &self.config,
        )
    }

    /// Turns candidates into accepted boundaries and type headers.
    ///
    /// Numbered candidates go through the recognizer; type headers carry no
    /// numeral, so the class itself stands in for the pattern signal. A
    /// candidate without a recognition confidence falls back to its
    /// detector confidence rather than being zeroed out.
    fn score_candidates(
        &self,
        recognizer: &NumberRecognizer,
        candidates: Vec<BoundaryCandidate>,
    ) -> (Vec<QuestionBoundary>, Vec<QuestionBoundary>) {
        let mut boundaries = Vec::new();
        let mut type_headers = Vec::new();

        for candidate in candidates {
            let recognition_confidence = candidate
                .recognition_confidence
                .unwrap_or(candidate.detector_confidence);

            if candidate.boundary_type == BoundaryType::QuestionType {
                let combined = NumberRecognizer::combined_confidence(
                    candidate.detector_confidence,
                    recognition_confidence,
                    1.0,
                );
                if combined >= self.config.acceptance_threshold {
                    type_headers.push(QuestionBoundary {
                        identifier: candidate.raw_text.to_string(),
                        boundary_type: candidate.boundary_type,
                        position: candidate.position,
                        size: candidate.size,
                        source_region_id: candidate.source_region_id,
                        raw_text: candidate.raw_text,
                        pattern_score: 1.0,
                        combined_confidence: combined,
                    });
                }
                continue;
            }

            let Some(extracted) = recognizer.extract(
                &candidate.raw_text,
                candidate.detector_confidence,
                recognition_confidence,
            ) else {
                debug!(
                    region_id = candidate.source_region_id,
                    raw = %candidate.raw_text,
                    "discarded numbering candidate"
                );
                continue;
            };

            boundaries.push(QuestionBoundary {
                identifier: extracted.identifier,
                boundary_type: candidate.boundary_type,
                position: candidate.position,
                size: candidate.size,
                source_region_id: candidate.source_region_id,
                raw_text: candidate.raw_text,
                pattern_score: extracted.pattern_score,
                combined_confidence: extracted.combined_confidence,
            });
        }

        (boundaries, type_headers)
    }
}

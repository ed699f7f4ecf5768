//! Final structure assembly: classification, grouping, and ordering.
//!
//! The assembler takes everything the earlier stages produced (accepted
//! boundaries, per-region assignments, the column layout, and the sequence
//! corrections) and emits the ordered, categorized structured document.

use crate::core::config::StructureConfig;
use crate::domain::boundary::{BoundaryType, QuestionBoundary};
use crate::domain::region::{Region, RegionClass};
use crate::domain::structure::{
    DataQualityWarning, LayoutType, QuestionGroup, RegionCategory, StructuredDocument,
};
use crate::processors::column_detect::{ColumnRange, column_of};
use crate::processors::sequence_validation::CorrectionResult;
use crate::processors::spatial_assign::{AssignedBoundary, weighted_distance};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::debug;

/// Leading answer-choice marker: a circled numeral, `(n)`, or `n.`.
static CHOICE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[①-⑮]|\(\d{1,2}\)|\d{1,2}\.\s)")
        .unwrap_or_else(|e| panic!("Invalid choice-marker regex: {e}"))
});

/// Cue phrases meaning "refer to the following/above/figure/table".
const PASSAGE_CUES: [&str; 6] = ["다음", "위 그림", "아래 그림", "위 표", "아래 표", "보기"];

/// Cue phrases meaning "explanation/solution/answer:".
const EXPLANATION_CUES: [&str; 3] = ["해설", "풀이", "정답:"];

/// Classifies one assigned region into its semantic category.
///
/// Visual classes are categorized by class alone. Textual classes are
/// sub-classified by lexical cues on their recognized text; a generated
/// description never participates for them.
pub fn classify_region(region: &Region) -> RegionCategory {
    match region.class() {
        RegionClass::Figure | RegionClass::Chart | RegionClass::Flowchart => RegionCategory::Figure,
        RegionClass::Table => RegionCategory::Table,
        RegionClass::Formula => RegionCategory::Formula,
        _ => {
            let Some(text) = region.content_text() else {
                return RegionCategory::QuestionText;
            };
            if CHOICE_MARKER.is_match(text) {
                RegionCategory::Choice
            } else if EXPLANATION_CUES.iter().any(|cue| text.contains(cue)) {
                RegionCategory::Explanation
            } else if PASSAGE_CUES.iter().any(|cue| text.contains(cue)) {
                RegionCategory::Passage
            } else {
                RegionCategory::QuestionText
            }
        }
    }
}

/// Derives the page layout label.
fn derive_layout(
    question_count: usize,
    column_count: usize,
    config: &StructureConfig,
) -> LayoutType {
    if question_count == 0 {
        LayoutType::Empty
    } else if column_count > 1 {
        LayoutType::MultiColumn
    } else if question_count <= 2 {
        LayoutType::Simple
    } else if question_count >= config.dense_question_count {
        LayoutType::Dense
    } else {
        LayoutType::Standard
    }
}

/// Index of the main boundary nearest to a position, by the same weighted
/// distance the assigner uses.
fn nearest_main(
    boundaries: &[QuestionBoundary],
    mains: &[usize],
    position: &crate::processors::Point,
) -> Option<usize> {
    mains
        .iter()
        .copied()
        .min_by(|&a, &b| {
            weighted_distance(&boundaries[a].position, position)
                .partial_cmp(&weighted_distance(&boundaries[b].position, position))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    boundaries[a]
                        .numeric_identifier()
                        .cmp(&boundaries[b].numeric_identifier())
                })
        })
}

/// Builds the final structured document.
///
/// `assignments` is parallel to `regions` and references indices into
/// `boundaries` (main and sub-question boundaries). `type_headers` are the
/// accepted question-type boundaries, attached to their nearest group.
/// Empty boundary input yields an empty-layout document, never an error.
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    boundaries: &[QuestionBoundary],
    type_headers: &[QuestionBoundary],
    regions: &[Region],
    assignments: &[Option<AssignedBoundary>],
    columns: &[ColumnRange],
    corrections: &CorrectionResult,
    warnings: Vec<DataQualityWarning>,
    config: &StructureConfig,
) -> StructuredDocument {
    let mains: Vec<usize> = boundaries
        .iter()
        .enumerate()
        .filter(|(_, b)| b.boundary_type == BoundaryType::QuestionNumber)
        .map(|(i, _)| i)
        .collect();

    // One group per main boundary, in reading (y) order; boundary index ->
    // owning group slot, with sub-boundaries folded into the nearest main.
    let mut groups: Vec<QuestionGroup> = Vec::with_capacity(mains.len());
    let mut owner_of: HashMap<usize, usize> = HashMap::new();
    for (slot, &index) in mains.iter().enumerate() {
        let boundary = &boundaries[index];
        let question_number = corrections
            .ocr_corrections
            .get(&boundary.identifier)
            .cloned()
            .unwrap_or_else(|| boundary.identifier.clone());
        owner_of.insert(index, slot);
        groups.push(QuestionGroup {
            question_number,
            column_index: column_of(columns, boundary.position.x),
            boundary: boundary.clone(),
            categories: BTreeMap::new(),
            sub_questions: BTreeMap::new(),
            question_type: None,
            region_count: 0,
            y_range: (boundary.position.y, boundary.position.y + boundary.size.1),
        });
    }
    for (index, boundary) in boundaries.iter().enumerate() {
        if boundary.boundary_type == BoundaryType::SubQuestionNumber
            && let Some(parent) = nearest_main(boundaries, &mains, &boundary.position)
        {
            owner_of.insert(index, owner_of[&parent]);
        }
    }

    // Question-type headers tag the nearest group; the first header in
    // reading order wins.
    for header in type_headers {
        if let Some(parent) = nearest_main(boundaries, &mains, &header.position) {
            let group = &mut groups[owner_of[&parent]];
            if group.question_type.is_none() {
                group.question_type = Some(header.raw_text.clone());
            }
        }
    }

    let mut unassigned = Vec::new();
    for (region, assignment) in regions.iter().zip(assignments) {
        let Some(assignment) = assignment else {
            unassigned.push(region.clone());
            continue;
        };
        let Some(&slot) = owner_of.get(&assignment.boundary_index) else {
            unassigned.push(region.clone());
            continue;
        };

        let owner = &boundaries[assignment.boundary_index];
        let group = &mut groups[slot];
        if owner.boundary_type == BoundaryType::SubQuestionNumber {
            group
                .sub_questions
                .entry(owner.identifier.clone())
                .or_default()
                .push(region.clone());
        } else {
            group
                .categories
                .entry(classify_region(region))
                .or_default()
                .push(region.clone());
        }
        group.region_count += 1;
        group.y_range.0 = group.y_range.0.min(region.bbox.y);
        group.y_range.1 = group.y_range.1.max(region.bbox.y_max());
    }

    // Column-major reading order: ascending column, then boundary y.
    groups.sort_by(|a, b| {
        a.column_index.cmp(&b.column_index).then(
            a.boundary
                .position
                .y
                .partial_cmp(&b.boundary.position.y)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let layout_type = derive_layout(groups.len(), columns.len(), config);
    debug!(
        questions = groups.len(),
        unassigned = unassigned.len(),
        layout = layout_type.as_str(),
        "assembled page structure"
    );

    StructuredDocument {
        total_questions: groups.len(),
        layout_type,
        questions: groups,
        unassigned_regions: unassigned,
        columns: columns.to_vec(),
        corrections: corrections.clone(),
        warnings,
    }
}

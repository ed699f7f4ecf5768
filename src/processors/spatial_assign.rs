//! Spatial assignment of regions to their owning question boundary.
//!
//! Every non-boundary region is pulled toward the nearest boundary by a
//! direction-weighted 2D distance: content below its question number is the
//! expected reading direction and is favored, content above is penalized.
//! Column membership only tags the result for final ordering; it never
//! restricts which boundaries are candidates.

use crate::core::config::StructureConfig;
use crate::domain::boundary::QuestionBoundary;
use crate::domain::region::Region;
use crate::processors::Point;
use crate::processors::column_detect::{ColumnRange, column_of};

/// Distance weight when the region lies below the boundary.
const BELOW_WEIGHT: f32 = 0.7;
/// Distance weight when the region lies above the boundary.
const ABOVE_WEIGHT: f32 = 1.5;

/// The boundary a region was assigned to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignedBoundary {
    /// Index into the boundary list.
    pub boundary_index: usize,
    /// Column index of the owning boundary.
    pub column_index: usize,
    /// The winning weighted distance.
    pub weighted_distance: f32,
}

/// Direction-weighted Euclidean distance from a boundary to a region
/// centroid.
pub fn weighted_distance(boundary_position: &Point, centroid: &Point) -> f32 {
    let dy = centroid.y - boundary_position.y;
    let euclidean = boundary_position.distance_to(centroid);
    let weight = if dy >= 0.0 { BELOW_WEIGHT } else { ABOVE_WEIGHT };
    euclidean * weight
}

/// Assigns regions to their nearest accepted boundary.
///
/// A pure function of its inputs: no I/O, no mutation, safe to call
/// independently and in parallel for every region on a page.
#[derive(Debug)]
pub struct SpatialAssigner<'a> {
    boundaries: &'a [QuestionBoundary],
    columns: &'a [ColumnRange],
    config: &'a StructureConfig,
}

impl<'a> SpatialAssigner<'a> {
    /// Creates an assigner over a fixed boundary list and column layout.
    pub fn new(
        boundaries: &'a [QuestionBoundary],
        columns: &'a [ColumnRange],
        config: &'a StructureConfig,
    ) -> Self {
        Self {
            boundaries,
            columns,
            config,
        }
    }

    /// The acceptance threshold for one region.
    ///
    /// Large or visually heavy regions (figures, tables, formulas,
    /// flowcharts) sit farther from their question number, so they get the
    /// wider base before the density scale applies.
    fn effective_threshold(&self, region: &Region) -> f32 {
        let large = region.bbox.area() >= self.config.large_region_area
            || region.class().is_large_format();
        let base = if large {
            self.config.large_assign_distance
        } else {
            self.config.base_assign_distance
        };

        let count = self.boundaries.len();
        let scale = if count <= self.config.sparse_boundary_count {
            self.config.sparse_scale
        } else if count >= self.config.dense_boundary_count {
            self.config.dense_scale
        } else {
            1.0
        };

        base * scale
    }

    /// Assigns one region, or returns `None` when every boundary is beyond
    /// the acceptance threshold.
    ///
    /// Exact distance ties go to the boundary with the numerically
    /// smallest identifier.
    pub fn assign(&self, region: &Region) -> Option<AssignedBoundary> {
        if self.boundaries.is_empty() {
            return None;
        }

        let centroid = region.bbox.center();
        let mut best_index = 0;
        let mut best_distance = f32::INFINITY;
        for (index, boundary) in self.boundaries.iter().enumerate() {
            let distance = weighted_distance(&boundary.position, &centroid);
            let better = distance < best_distance
                || (distance == best_distance
                    && identifier_rank(boundary) < identifier_rank(&self.boundaries[best_index]));
            if better {
                best_index = index;
                best_distance = distance;
            }
        }

        if best_distance > self.effective_threshold(region) {
            return None;
        }

        let boundary = &self.boundaries[best_index];
        Some(AssignedBoundary {
            boundary_index: best_index,
            column_index: column_of(self.columns, boundary.position.x),
            weighted_distance: best_distance,
        })
    }
}

/// Tie-break ordering: numeric identifiers first, smallest value wins;
/// non-numeric identifiers compare lexicographically after them.
fn identifier_rank(boundary: &QuestionBoundary) -> (u8, u32, &str) {
    match boundary.numeric_identifier() {
        Some(n) => (0, n, ""),
        None => (1, 0, boundary.identifier.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::boundary::BoundaryType;
    use crate::processors::BoundingBox;
    use crate::processors::column_detect::detect_columns;

    fn boundary(identifier: &str, x: f32, y: f32) -> QuestionBoundary {
        QuestionBoundary {
            identifier: identifier.to_string(),
            boundary_type: BoundaryType::QuestionNumber,
            position: Point::new(x, y),
            size: (40.0, 20.0),
            source_region_id: 0,
            raw_text: format!("{identifier}번").into(),
            pattern_score: 1.0,
            combined_confidence: 0.9,
        }
    }

    fn text_region(id: u32, cx: f32, cy: f32) -> Region {
        // 10x10 box centered on (cx, cy).
        Region::new(
            id,
            "text",
            BoundingBox::new(cx - 5.0, cy - 5.0, 10.0, 10.0),
            0.9,
        )
    }

    #[test]
    fn test_below_is_favored_over_above() {
        let origin = Point::new(0.0, 0.0);
        let below = Point::new(0.0, 100.0);
        let above = Point::new(0.0, -100.0);
        assert_eq!(weighted_distance(&origin, &below), 70.0);
        assert_eq!(weighted_distance(&origin, &above), 150.0);
    }

    #[test]
    fn test_assigns_nearest_boundary() {
        let config = StructureConfig::default();
        let boundaries = vec![boundary("1", 100.0, 100.0), boundary("2", 100.0, 400.0)];
        let columns = detect_columns(&[100.0], 1000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);

        let region = text_region(1, 110.0, 150.0);
        let assigned = assigner.assign(&region).unwrap();
        assert_eq!(assigned.boundary_index, 0);
        assert_eq!(assigned.column_index, 0);
    }

    #[test]
    fn test_tie_breaks_on_smallest_identifier() {
        let config = StructureConfig::default();
        // Both boundaries are 100 units above the centroid, exact tie.
        let boundaries = vec![boundary("7", 200.0, 100.0), boundary("3", 0.0, 100.0)];
        let columns = detect_columns(&[0.0], 1000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);

        // Equidistant point on the perpendicular bisector, below both.
        let region = text_region(1, 100.0, 200.0);
        let assigned = assigner.assign(&region).unwrap();
        assert_eq!(boundaries[assigned.boundary_index].identifier, "3");
    }

    #[test]
    fn test_threshold_boundary_exact_and_beyond() {
        let config = StructureConfig {
            base_assign_distance: 750.0,
            ..Default::default()
        };
        // Six boundaries keep the density scale at exactly 1.0.
        let mut boundaries = vec![boundary("1", 0.0, 1000.0)];
        for i in 2..=6 {
            boundaries.push(boundary(&i.to_string(), 10_000.0, i as f32 * 1000.0));
        }
        let columns = detect_columns(&[0.0], 20_000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);

        // Centroid 500 above boundary 1: weighted = 500 * 1.5 = 750.0,
        // exactly the threshold; accepted.
        let at_threshold = text_region(1, 0.0, 500.0);
        let assigned = assigner.assign(&at_threshold).unwrap();
        assert_eq!(assigned.weighted_distance, 750.0);
        assert_eq!(boundaries[assigned.boundary_index].identifier, "1");

        // One unit farther: weighted = 501 * 1.5 = 751.5; unassigned.
        let beyond = text_region(2, 0.0, 499.0);
        assert!(assigner.assign(&beyond).is_none());
    }

    #[test]
    fn test_sparse_scale_widens_threshold() {
        let config = StructureConfig::default();
        let boundaries = vec![boundary("1", 0.0, 0.0)];
        let columns = detect_columns(&[0.0], 1000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);

        // Weighted distance 560 exceeds the base 500 but stays inside the
        // sparse-page threshold 500 * 1.2.
        let region = text_region(1, 0.0, 800.0);
        let assigned = assigner.assign(&region).unwrap();
        assert_eq!(assigned.weighted_distance, 560.0);

        // 700 * 1.2 = 840 > 600; unassigned even on a sparse page.
        let far = text_region(2, 0.0, 1200.0);
        assert!(assigner.assign(&far).is_none());
    }

    #[test]
    fn test_visually_heavy_regions_use_wider_base() {
        let config = StructureConfig::default();
        let boundaries = vec![boundary("1", 0.0, 0.0)];
        let columns = detect_columns(&[0.0], 1000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);

        // Weighted distance 700: past the ordinary sparse threshold (600)
        // but within the large-region one (800 * 1.2).
        let text = text_region(1, 0.0, 1000.0);
        assert!(assigner.assign(&text).is_none());

        let figure = Region::new(2, "figure", BoundingBox::new(-5.0, 995.0, 10.0, 10.0), 0.9);
        let assigned = assigner.assign(&figure).unwrap();
        assert_eq!(assigned.weighted_distance, 700.0);
    }

    #[test]
    fn test_large_area_triggers_wider_base() {
        let config = StructureConfig::default();
        let boundaries = vec![boundary("1", 0.0, 0.0)];
        let columns = detect_columns(&[0.0], 1000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);

        // A plain text region with area 800x800 >= 600,000 counts as large.
        let big = Region::new(1, "text", BoundingBox::new(-400.0, 600.0, 800.0, 800.0), 0.9);
        let assigned = assigner.assign(&big).unwrap();
        assert_eq!(assigned.weighted_distance, 700.0);
    }

    #[test]
    fn test_no_boundaries_means_unassigned() {
        let config = StructureConfig::default();
        let boundaries: Vec<QuestionBoundary> = Vec::new();
        let columns = detect_columns(&[], 1000.0, &config);
        let assigner = SpatialAssigner::new(&boundaries, &columns, &config);
        assert!(assigner.assign(&text_region(1, 100.0, 100.0)).is_none());
    }
}

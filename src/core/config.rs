//! Configuration for page-structure analysis.

use crate::core::StructResult;
use crate::core::validation::{validate_finite, validate_positive, validate_range};
use serde::{Deserialize, Serialize};

/// Tunable parameters for the page-structure pipeline.
///
/// The defaults reproduce the documented behavior of the system; callers
/// normally construct this with [`StructureConfig::default`] and override
/// individual fields. Every analyzer validates its config once at
/// construction via [`StructureConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Minimum combined confidence for a numbering mark to become a boundary.
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f32,

    /// Base assignment distance for ordinary regions.
    #[serde(default = "default_base_assign_distance")]
    pub base_assign_distance: f32,

    /// Base assignment distance for large or visually heavy regions.
    #[serde(default = "default_large_assign_distance")]
    pub large_assign_distance: f32,

    /// Box area at or above which a region counts as large.
    #[serde(default = "default_large_region_area")]
    pub large_region_area: f32,

    /// Boundary count at or below which a page counts as sparse.
    #[serde(default = "default_sparse_boundary_count")]
    pub sparse_boundary_count: usize,

    /// Threshold scale applied on sparse pages.
    #[serde(default = "default_sparse_scale")]
    pub sparse_scale: f32,

    /// Boundary count at or above which a page counts as dense.
    #[serde(default = "default_dense_boundary_count")]
    pub dense_boundary_count: usize,

    /// Threshold scale applied on dense pages.
    #[serde(default = "default_dense_scale")]
    pub dense_scale: f32,

    /// Fraction of the page width a gap must exceed to split columns.
    #[serde(default = "default_column_gap_ratio")]
    pub column_gap_ratio: f32,

    /// Lower bound on the column gap threshold for small pages.
    #[serde(default = "default_column_gap_floor")]
    pub column_gap_floor: f32,

    /// Fraction of the page width above which a gap is a measurement
    /// anomaly and never splits columns.
    #[serde(default = "default_column_noise_ceiling_ratio")]
    pub column_noise_ceiling_ratio: f32,

    /// Whether bare 2-3 digit numerals may form boundaries. Only suitable
    /// for densely numbered documents; higher false-positive risk.
    #[serde(default)]
    pub allow_bare_numerals: bool,

    /// Question count at or above which the page layout is labeled dense.
    #[serde(default = "default_dense_question_count")]
    pub dense_question_count: usize,
}

fn default_acceptance_threshold() -> f32 {
    0.70
}
fn default_base_assign_distance() -> f32 {
    500.0
}
fn default_large_assign_distance() -> f32 {
    800.0
}
fn default_large_region_area() -> f32 {
    600_000.0
}
fn default_sparse_boundary_count() -> usize {
    5
}
fn default_sparse_scale() -> f32 {
    1.2
}
fn default_dense_boundary_count() -> usize {
    80
}
fn default_dense_scale() -> f32 {
    0.8
}
fn default_column_gap_ratio() -> f32 {
    0.10
}
fn default_column_gap_floor() -> f32 {
    50.0
}
fn default_column_noise_ceiling_ratio() -> f32 {
    0.80
}
fn default_dense_question_count() -> usize {
    20
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: default_acceptance_threshold(),
            base_assign_distance: default_base_assign_distance(),
            large_assign_distance: default_large_assign_distance(),
            large_region_area: default_large_region_area(),
            sparse_boundary_count: default_sparse_boundary_count(),
            sparse_scale: default_sparse_scale(),
            dense_boundary_count: default_dense_boundary_count(),
            dense_scale: default_dense_scale(),
            column_gap_ratio: default_column_gap_ratio(),
            column_gap_floor: default_column_gap_floor(),
            column_noise_ceiling_ratio: default_column_noise_ceiling_ratio(),
            allow_bare_numerals: false,
            dense_question_count: default_dense_question_count(),
        }
    }
}

impl StructureConfig {
    /// Checks that every parameter is in its valid range.
    pub fn validate(&self) -> StructResult<()> {
        validate_range(self.acceptance_threshold, 0.0, 1.0, "acceptance_threshold")?;
        validate_positive(self.base_assign_distance, "base_assign_distance")?;
        validate_positive(self.large_assign_distance, "large_assign_distance")?;
        validate_positive(self.large_region_area, "large_region_area")?;
        validate_finite(self.sparse_scale, "sparse_scale")?;
        validate_positive(self.sparse_scale, "sparse_scale")?;
        validate_finite(self.dense_scale, "dense_scale")?;
        validate_positive(self.dense_scale, "dense_scale")?;
        validate_range(self.column_gap_ratio, 0.0, 1.0, "column_gap_ratio")?;
        validate_positive(self.column_gap_floor, "column_gap_floor")?;
        validate_range(
            self.column_noise_ceiling_ratio,
            0.0,
            1.0,
            "column_noise_ceiling_ratio",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StructureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let config = StructureConfig {
            acceptance_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        let config = StructureConfig {
            base_assign_distance: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_scale() {
        let config = StructureConfig {
            sparse_scale: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

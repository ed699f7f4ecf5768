//! Analysis stages for page-structure reconstruction.
//!
//! Each stage is a pure transformation; the pipeline module wires them
//! together in order:
//!
//! * `boundary_extract` - Filter regions down to numbering marks
//! * `number_recognition` - Clean OCR text and score numbering patterns
//! * `column_detect` - Partition the page into column ranges
//! * `spatial_assign` - Assign regions to their nearest boundary
//! * `sequence_validation` - Validate numbering order and recover OCR errors
//! * `assembler` - Classify, group, and order into the final document
//! * `geometry` - Shared geometric primitives

pub mod assembler;
pub mod boundary_extract;
pub mod column_detect;
pub mod geometry;
pub mod number_recognition;
pub mod sequence_validation;
pub mod spatial_assign;

pub use geometry::{BoundingBox, Point};

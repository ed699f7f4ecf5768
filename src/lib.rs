//! # exam-struct
//!
//! Question-structure reconstruction for scanned educational document pages.
//!
//! Given the detected layout regions of one page (each tagged with a layout
//! class, a bounding box, a detector confidence, and optionally recognized
//! text or a generated description), this crate reconstructs the page's
//! logical structure: which regions belong to which numbered question, in
//! what reading order, and with what semantic role.
//!
//! The whole pipeline is a synchronous, pure, CPU-bound transformation over
//! an immutable snapshot of one page. It performs no I/O and holds no state
//! across calls, so a caller may process pages concurrently without
//! coordination.
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, and parameter validation
//! * [`domain`] - Domain types (regions, boundaries, the structured result)
//! * [`processors`] - The six analysis stages, from boundary extraction to
//!   final assembly
//! * [`pipeline`] - The [`pipeline::StructureAnalyzer`] orchestrating one
//!   page-level analysis

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error handling
    pub use crate::core::{StructError, StructResult};

    // Configuration
    pub use crate::core::config::StructureConfig;

    // Domain types
    pub use crate::domain::boundary::{BoundaryType, QuestionBoundary};
    pub use crate::domain::region::{Region, RegionClass};
    pub use crate::domain::structure::{
        DataQualityWarning, LayoutType, QuestionGroup, RegionCategory, StructuredDocument,
    };

    // Geometry types
    pub use crate::processors::{BoundingBox, Point};

    // Stage outputs a caller may want to inspect
    pub use crate::processors::column_detect::ColumnRange;
    pub use crate::processors::sequence_validation::{
        CorrectionKind, CorrectionLog, CorrectionResult,
    };

    // High-level API
    pub use crate::pipeline::{PageInput, StructureAnalyzer};
}

// mod.rs - Core EHH scan engine

pub mod colors;
pub mod decay;
pub mod homozygosity;
pub mod partition;
pub mod progress;
pub mod stats;
pub mod tracker;

// Re-export main types for convenience
pub use colors::{ColorGrid, LineageColorer, UNIQUE_COLOR};
pub use decay::{scan_direction, DecayObserver, DecayState, ScanAbort, ScanParams, MAX_EXTEND_BP};
pub use homozygosity::{Homozygosity, SoftTriplet};
pub use partition::{run_blocks, Partition};
pub use progress::ScanProgress;
pub use stats::{
    ehh_curve, scan_ihs, scan_soft, scan_xpehh, EhhCurve, EhhRow, EhhValues, IhsLocus, LocusSkip,
    SoftLocus, XpLocus,
};
pub use tracker::{Direction, ExtensionTracker, Grouping};

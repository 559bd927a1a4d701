// lib.rs - ehhscan library root

//! # ehhscan - Multithreaded EHH-based scans for positive selection
//!
//! This library measures how quickly haplotype homozygosity decays with
//! genetic distance from a core locus and turns the decay into per-locus
//! selection statistics.
//!
//! ## Features
//!
//! - **iHS**: derived versus ancestral integrated haplotype homozygosity
//! - **XP-EHH**: the same comparison between two populations
//! - **Soft sweeps**: integrated h1, h12 and h2/h1
//! - **Single-locus EHH**: raw decay curve plus haplotype family colors
//! - **Parallel scans**: contiguous locus blocks on a dedicated thread pool
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use ehhscan::prelude::*;
//!
//! let haps = GenotypeMatrix::from_hap_file(std::path::Path::new("chr1.hap"))?;
//! let map = LocusMap::from_map_file(std::path::Path::new("chr1.map"))?;
//! let params = ScanParams::default();
//!
//! let results = scan_ihs(
//!     &haps,
//!     &map,
//!     &params,
//!     &Partition::new(map.len(), 4),
//!     &RunLog::sink(),
//!     &ScanProgress::hidden(map.len()),
//! )?;
//! # Ok::<(), String>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod output;

#[cfg(test)]
pub(crate) mod test_support;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{ehh_curve, scan_ihs, scan_soft, scan_xpehh};
    pub use crate::core::{Homozygosity, Partition, ScanParams, ScanProgress};
    pub use crate::core::{EhhCurve, IhsLocus, SoftLocus, XpLocus};
    pub use crate::data::{Allele, GenotypeMatrix, LocusMap};
    pub use crate::output::RunLog;
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{Homozygosity, ScanParams};
pub use data::{GenotypeMatrix, LocusMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "ehhscan v{} - EHH-based selection scans (iHS, XP-EHH, h12)",
        VERSION
    )
}

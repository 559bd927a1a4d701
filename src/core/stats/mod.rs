// mod.rs - Per-locus statistic drivers

pub mod ehh;
pub mod ihs;
pub mod soft;
pub mod xpehh;

pub use ehh::{ehh_curve, EhhCurve, EhhRow, EhhValues};
pub use ihs::{ihs_at, scan_ihs, IhsLocus};
pub use soft::{scan_soft, soft_at, SoftLocus};
pub use xpehh::{scan_xpehh, xpehh_at, XpLocus};

use crate::core::decay::{ScanAbort, ScanParams};
use crate::core::partition::{run_blocks, Partition};
use crate::core::progress::ScanProgress;
use crate::data::LocusMap;
use crate::output::RunLog;

/// Why a core locus has no result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocusSkip {
    BelowMaf { freq: f64 },
    /// No haplotype carries a called allele at the core
    Uncalled,
    Aborted(ScanAbort),
}

impl From<ScanAbort> for LocusSkip {
    fn from(abort: ScanAbort) -> Self {
        LocusSkip::Aborted(abort)
    }
}

impl LocusSkip {
    pub fn describe(&self, map: &LocusMap, core: usize, params: &ScanParams) -> String {
        let name = map.name(core);
        match self {
            LocusSkip::BelowMaf { .. } => format!(
                "WARNING: Locus {} has MAF < {}. Skipping calculation at {}",
                name, params.maf, name
            ),
            LocusSkip::Uncalled => format!(
                "WARNING: Locus {} has no called alleles. Skipping calculation at {}",
                name, name
            ),
            LocusSkip::Aborted(abort) => abort.describe(map, core, params),
        }
    }
}

/// Run `compute` at every locus of the partition
///
/// Skipped loci become `None` and leave a warning in the log.
pub fn scan_loci<R, F>(
    map: &LocusMap,
    params: &ScanParams,
    partition: &Partition,
    log: &RunLog,
    progress: &ScanProgress,
    compute: F,
) -> Result<Vec<Option<R>>, String>
where
    R: Send,
    F: Fn(usize) -> Result<R, LocusSkip> + Sync,
{
    let mut results: Vec<Option<R>> = (0..partition.n_loci()).map(|_| None).collect();

    run_blocks(partition, &mut results, |locus| {
        let outcome = compute(locus);
        progress.tick();
        match outcome {
            Ok(result) => Some(result),
            Err(skip) => {
                log.warn(&skip.describe(map, locus, params));
                None
            }
        }
    })?;
    progress.finish();

    Ok(results)
}

// ihs.rs - Integrated haplotype score driver

use crate::core::decay::{scan_direction, DecayObserver, DecayState, ScanAbort, ScanParams, ScanStep};
use crate::core::partition::Partition;
use crate::core::progress::ScanProgress;
use crate::core::stats::{scan_loci, LocusSkip};
use crate::core::tracker::{Direction, ExtensionTracker};
use crate::data::{GenotypeMatrix, LocusMap};
use crate::output::RunLog;

/// Result at one core locus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IhsLocus {
    /// Derived allele frequency at the core
    pub freq: f64,
    pub ihh_derived: f64,
    pub ihh_ancestral: f64,
}

impl IhsLocus {
    /// ln(iHH derived / iHH ancestral); `None` when either integral is zero
    pub fn ihs(&self) -> Option<f64> {
        if self.ihh_derived <= 0.0 || self.ihh_ancestral <= 0.0 {
            return None;
        }
        let value = (self.ihh_derived / self.ihh_ancestral).ln();
        value.is_finite().then_some(value)
    }
}

/// Derived and ancestral subsets decaying together in one direction
struct AlleleSplitDecay<'s> {
    derived: &'s [usize],
    ancestral: &'s [usize],
    params: &'s ScanParams,
    derived_state: DecayState,
    ancestral_state: DecayState,
}

impl<'s> AlleleSplitDecay<'s> {
    fn new(derived: &'s [usize], ancestral: &'s [usize], params: &'s ScanParams) -> Self {
        Self {
            derived,
            ancestral,
            params,
            derived_state: DecayState::starting_at(1.0),
            ancestral_state: DecayState::starting_at(1.0),
        }
    }
}

impl DecayObserver for AlleleSplitDecay<'_> {
    fn is_done(&self) -> bool {
        !self.derived_state.is_scanning() && !self.ancestral_state.is_scanning()
    }

    fn observe(&mut self, step: &ScanStep<'_, '_>) -> Result<(), ScanAbort> {
        let cutoff = self.params.ehh_cutoff;
        let estimator = self.params.homozygosity;

        for (subset, state) in [
            (self.derived, &mut self.derived_state),
            (self.ancestral, &mut self.ancestral_state),
        ] {
            let grouping = step.tracker.grouping(subset);
            if grouping.total() == 0 {
                return Err(ScanAbort::Monomorphic);
            }
            if state.is_scanning() {
                let ehh = estimator.estimate(grouping.sizes(), grouping.total());
                state.advance_until(ehh, step.weight, cutoff);
            }
        }
        Ok(())
    }
}

/// iHH of the derived and ancestral haplotypes around one core locus
pub fn ihs_at(
    haps: &GenotypeMatrix,
    map: &LocusMap,
    core: usize,
    params: &ScanParams,
) -> Result<IhsLocus, LocusSkip> {
    let freq = haps.allele_frequency(core).ok_or(LocusSkip::Uncalled)?;
    if params.below_maf(freq) {
        return Err(LocusSkip::BelowMaf { freq });
    }

    let mut ihh_derived = 0.0;
    let mut ihh_ancestral = 0.0;

    for direction in Direction::BOTH {
        let mut tracker = ExtensionTracker::seeded(vec![haps], core);
        let (derived, ancestral) = tracker.partition_by_allele(core);
        let mut decay = AlleleSplitDecay::new(&derived, &ancestral, params);
        scan_direction(map, core, direction, params, &mut tracker, &mut decay)?;
        ihh_derived += decay.derived_state.integral();
        ihh_ancestral += decay.ancestral_state.integral();
    }

    Ok(IhsLocus {
        freq,
        ihh_derived,
        ihh_ancestral,
    })
}

/// Genome-wide iHS scan
pub fn scan_ihs(
    haps: &GenotypeMatrix,
    map: &LocusMap,
    params: &ScanParams,
    partition: &Partition,
    log: &RunLog,
    progress: &ScanProgress,
) -> Result<Vec<Option<IhsLocus>>, String> {
    scan_loci(map, params, partition, log, progress, |core| {
        ihs_at(haps, map, core, params)
    })
}

// soft.rs - Soft-sweep haplotype statistics driver

use crate::core::decay::{scan_direction, DecayObserver, DecayState, ScanAbort, ScanParams, ScanStep};
use crate::core::homozygosity::SoftTriplet;
use crate::core::partition::Partition;
use crate::core::progress::ScanProgress;
use crate::core::stats::{scan_loci, LocusSkip};
use crate::core::tracker::{Direction, ExtensionTracker};
use crate::data::{GenotypeMatrix, LocusMap};
use crate::output::RunLog;

/// Integrated h1, h12 and h2/h1 at one core locus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftLocus {
    pub freq: f64,
    pub h1: f64,
    pub h12: f64,
    pub h2_over_h1: f64,
}

/// All haplotypes as one set; h1 decides when to stop
struct SoftDecay<'s> {
    members: &'s [usize],
    k: usize,
    cutoff: f64,
    h1: DecayState,
    h12: DecayState,
    h2_over_h1: DecayState,
}

impl<'s> SoftDecay<'s> {
    fn new(members: &'s [usize], params: &ScanParams) -> Self {
        let core = SoftTriplet::at_core();
        Self {
            members,
            k: params.soft_k,
            cutoff: params.ehh_cutoff,
            h1: DecayState::governed_from(core.h1, params.ehh_cutoff),
            h12: DecayState::starting_at(core.h12),
            h2_over_h1: DecayState::starting_at(core.h2_over_h1),
        }
    }
}

impl DecayObserver for SoftDecay<'_> {
    fn is_done(&self) -> bool {
        !self.h1.is_scanning()
    }

    fn observe(&mut self, step: &ScanStep<'_, '_>) -> Result<(), ScanAbort> {
        let grouping = step.tracker.grouping(self.members);
        let triplet = SoftTriplet::from_groups(grouping.sizes(), grouping.total(), self.k);

        self.h12.advance(triplet.h12, step.weight);
        self.h2_over_h1.advance(triplet.h2_over_h1_or_zero(), step.weight);
        self.h1.advance_until(triplet.h1, step.weight, self.cutoff);
        Ok(())
    }
}

/// Soft-sweep integrals around one core locus
///
/// Haplotype identifiers leave out the core allele: the whole panel starts as
/// one group, giving (1, 1, 0) at the core, and carriers of both alleles can
/// share a group further out. The standard estimator is always used.
pub fn soft_at(
    haps: &GenotypeMatrix,
    map: &LocusMap,
    core: usize,
    params: &ScanParams,
) -> Result<SoftLocus, LocusSkip> {
    let freq = haps.allele_frequency(core).ok_or(LocusSkip::Uncalled)?;
    let mut result = SoftLocus {
        freq,
        h1: 0.0,
        h12: 0.0,
        h2_over_h1: 0.0,
    };

    for direction in Direction::BOTH {
        let mut tracker = ExtensionTracker::new(vec![haps]);
        let members = tracker.all_members();
        let mut decay = SoftDecay::new(&members, params);
        scan_direction(map, core, direction, params, &mut tracker, &mut decay)?;
        result.h1 += decay.h1.integral();
        result.h12 += decay.h12.integral();
        result.h2_over_h1 += decay.h2_over_h1.integral();
    }

    Ok(result)
}

/// Genome-wide soft-sweep scan
pub fn scan_soft(
    haps: &GenotypeMatrix,
    map: &LocusMap,
    params: &ScanParams,
    partition: &Partition,
    log: &RunLog,
    progress: &ScanProgress,
) -> Result<Vec<Option<SoftLocus>>, String> {
    scan_loci(map, params, partition, log, progress, |core| {
        soft_at(haps, map, core, params)
    })
}

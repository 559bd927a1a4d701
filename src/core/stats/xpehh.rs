// xpehh.rs - Cross-population EHH driver

use crate::core::decay::{scan_direction, DecayObserver, DecayState, ScanAbort, ScanParams, ScanStep};
use crate::core::homozygosity::Homozygosity;
use crate::core::partition::Partition;
use crate::core::progress::ScanProgress;
use crate::core::stats::{scan_loci, LocusSkip};
use crate::core::tracker::{Direction, ExtensionTracker};
use crate::data::{GenotypeMatrix, LocusMap};
use crate::output::RunLog;

/// Result at one core locus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpLocus {
    pub freq1: f64,
    pub ihh1: f64,
    pub freq2: f64,
    pub ihh2: f64,
}

impl XpLocus {
    /// ln(iHH pop1 / iHH pop2); `None` when either integral is zero
    pub fn xpehh(&self) -> Option<f64> {
        if self.ihh1 <= 0.0 || self.ihh2 <= 0.0 {
            return None;
        }
        let value = (self.ihh1 / self.ihh2).ln();
        value.is_finite().then_some(value)
    }
}

/// Population subsets plus the pooled set, which decides when to stop
struct PopulationDecay<'s> {
    pop1: &'s [usize],
    pop2: &'s [usize],
    pooled: &'s [usize],
    estimator: Homozygosity,
    cutoff: f64,
    pop1_state: DecayState,
    pop2_state: DecayState,
    pooled_state: DecayState,
}

impl DecayObserver for PopulationDecay<'_> {
    fn is_done(&self) -> bool {
        !self.pooled_state.is_scanning()
    }

    fn observe(&mut self, step: &ScanStep<'_, '_>) -> Result<(), ScanAbort> {
        let ehh = |subset: &[usize]| {
            let grouping = step.tracker.grouping(subset);
            self.estimator.estimate(grouping.sizes(), grouping.total())
        };
        let (pop1, pop2, pooled) = (ehh(self.pop1), ehh(self.pop2), ehh(self.pooled));

        self.pop1_state.advance(pop1, step.weight);
        self.pop2_state.advance(pop2, step.weight);
        self.pooled_state.advance_until(pooled, step.weight, self.cutoff);
        Ok(())
    }
}

/// iHH of both populations around one core locus
///
/// The core is not assumed homozygous here: each subset starts from the
/// homozygosity of its own derived/ancestral split at the core.
pub fn xpehh_at(
    pop1: &GenotypeMatrix,
    pop2: &GenotypeMatrix,
    map: &LocusMap,
    core: usize,
    params: &ScanParams,
) -> Result<XpLocus, LocusSkip> {
    let freq1 = pop1.allele_frequency(core).ok_or(LocusSkip::Uncalled)?;
    let freq2 = pop2.allele_frequency(core).ok_or(LocusSkip::Uncalled)?;
    let estimator = params.homozygosity;

    let mut ihh1 = 0.0;
    let mut ihh2 = 0.0;

    for direction in Direction::BOTH {
        let mut tracker = ExtensionTracker::seeded(vec![pop1, pop2], core);
        let first = tracker.panel_members(0);
        let second = tracker.panel_members(1);
        let pooled = tracker.all_members();

        let start = |subset: &[usize]| {
            let grouping = tracker.grouping(subset);
            estimator.estimate(grouping.sizes(), grouping.total())
        };
        let mut decay = PopulationDecay {
            pop1: &first,
            pop2: &second,
            pooled: &pooled,
            estimator,
            cutoff: params.ehh_cutoff,
            pop1_state: DecayState::starting_at(start(&first)),
            pop2_state: DecayState::starting_at(start(&second)),
            pooled_state: DecayState::governed_from(start(&pooled), params.ehh_cutoff),
        };

        scan_direction(map, core, direction, params, &mut tracker, &mut decay)?;
        ihh1 += decay.pop1_state.integral();
        ihh2 += decay.pop2_state.integral();
    }

    Ok(XpLocus {
        freq1,
        ihh1,
        freq2,
        ihh2,
    })
}

/// Genome-wide XP-EHH scan
pub fn scan_xpehh(
    pop1: &GenotypeMatrix,
    pop2: &GenotypeMatrix,
    map: &LocusMap,
    params: &ScanParams,
    partition: &Partition,
    log: &RunLog,
    progress: &ScanProgress,
) -> Result<Vec<Option<XpLocus>>, String> {
    scan_loci(map, params, partition, log, progress, |core| {
        xpehh_at(pop1, pop2, map, core, params)
    })
}

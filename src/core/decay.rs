// decay.rs - Directional EHH decay scan and trapezoid integration

use crate::core::homozygosity::Homozygosity;
use crate::core::tracker::{Direction, ExtensionTracker};
use crate::data::LocusMap;

/// Hard limit on physical distance from the core, in bp
pub const MAX_EXTEND_BP: i64 = 1_000_000;

/// Parameters shared by every scan of one run
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParams {
    pub ehh_cutoff: f64,
    pub max_gap: i64,
    pub gap_scale: i64,
    pub homozygosity: Homozygosity,
    pub maf: f64,
    /// Number of top haplotype groups pooled for h12
    pub soft_k: usize,
    /// Half-width of the single-locus window, in bp
    pub ehh_window: i64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            ehh_cutoff: 0.05,
            max_gap: 200_000,
            gap_scale: 20_000,
            homozygosity: Homozygosity::Standard,
            maf: 0.05,
            soft_k: 2,
            ehh_window: 100_000,
        }
    }
}

impl ScanParams {
    /// Down-weighting applied to a step spanning `gap` bp
    pub fn gap_scale_factor(&self, gap: i64) -> f64 {
        if gap <= 0 {
            1.0
        } else {
            (self.gap_scale as f64 / gap as f64).min(1.0)
        }
    }

    /// True when the derived frequency fails the minor allele frequency floor
    pub fn below_maf(&self, freq: f64) -> bool {
        freq < self.maf || freq > 1.0 - self.maf
    }
}

/// Reasons a directional scan gives up on its core locus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAbort {
    ChromosomeEdge,
    GapTooLarge { gap: i64 },
    Monomorphic,
}

impl ScanAbort {
    /// Warning line for the run log
    pub fn describe(&self, map: &LocusMap, core: usize, params: &ScanParams) -> String {
        let name = map.name(core);
        match self {
            ScanAbort::ChromosomeEdge => format!(
                "WARNING: Reached chromosome edge before EHH decayed below {}. Skipping calculation at {}",
                params.ehh_cutoff, name
            ),
            ScanAbort::GapTooLarge { gap } => format!(
                "WARNING: Reached a gap of {}bp > {}bp. Skipping calculation at {}",
                gap, params.max_gap, name
            ),
            ScanAbort::Monomorphic => format!(
                "WARNING: locus {} (number {}) is monomorphic. Skipping calculation at this locus.",
                name,
                core + 1
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayStatus {
    Scanning,
    /// EHH reached the cutoff; the integral no longer grows
    Frozen,
}

/// Running EHH and its integral for one subset in one direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayState {
    current: f64,
    previous: f64,
    integral: f64,
    status: DecayStatus,
}

impl DecayState {
    pub fn starting_at(ehh: f64) -> Self {
        Self {
            current: ehh,
            previous: ehh,
            integral: 0.0,
            status: DecayStatus::Scanning,
        }
    }

    /// Start a subset whose cutoff ends the scan; already frozen if the
    /// starting value is at or below the cutoff
    pub fn governed_from(ehh: f64, cutoff: f64) -> Self {
        let mut state = Self::starting_at(ehh);
        if ehh <= cutoff {
            state.status = DecayStatus::Frozen;
        }
        state
    }

    pub fn is_scanning(&self) -> bool {
        self.status == DecayStatus::Scanning
    }

    pub fn status(&self) -> DecayStatus {
        self.status
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Take one trapezoid step regardless of the cutoff
    pub fn advance(&mut self, ehh: f64, weight: f64) {
        self.previous = self.current;
        self.current = ehh;
        self.integral += 0.5 * weight * (self.current + self.previous);
    }

    /// Step while scanning, then freeze once the fresh value is at or below the cutoff
    pub fn advance_until(&mut self, ehh: f64, weight: f64, cutoff: f64) {
        if !self.is_scanning() {
            return;
        }
        self.advance(ehh, weight);
        if ehh <= cutoff {
            self.status = DecayStatus::Frozen;
        }
    }
}

/// One accepted extension step
pub struct ScanStep<'t, 'a> {
    pub tracker: &'t ExtensionTracker<'a>,
    pub locus: usize,
    /// Gap-scaled genetic distance covered by the step
    pub weight: f64,
}

/// Per-statistic bookkeeping driven by `scan_direction`
pub trait DecayObserver {
    /// True once the governing subset has decayed past the cutoff
    fn is_done(&self) -> bool;

    fn observe(&mut self, step: &ScanStep<'_, '_>) -> Result<(), ScanAbort>;
}

/// Walk away from `core` until the observer is done, the hard distance
/// limit is reached, or the scan aborts
pub fn scan_direction<O: DecayObserver>(
    map: &LocusMap,
    core: usize,
    direction: Direction,
    params: &ScanParams,
    tracker: &mut ExtensionTracker<'_>,
    observer: &mut O,
) -> Result<(), ScanAbort> {
    let core_pos = map.physical_pos(core);
    let mut current = core;

    while !observer.is_done() {
        let next = direction
            .next_locus(current, map.len())
            .ok_or(ScanAbort::ChromosomeEdge)?;

        let gap = (map.physical_pos(next) - map.physical_pos(current)).abs();
        if gap > params.max_gap {
            return Err(ScanAbort::GapTooLarge { gap });
        }

        let distance = (map.genetic_pos(next) - map.genetic_pos(current)).abs();
        let weight = params.gap_scale_factor(gap) * distance;

        tracker.extend(next);
        observer.observe(&ScanStep {
            tracker: &*tracker,
            locus: next,
            weight,
        })?;

        if (map.physical_pos(next) - core_pos).abs() >= MAX_EXTEND_BP {
            break;
        }
        current = next;
    }

    Ok(())
}

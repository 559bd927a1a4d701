// test_support.rs - Shared fixtures for unit tests

use crate::data::{GenotypeMatrix, LocusMap};

/// Panel plus a map placing locus i at (i+1) kb and 0.01·(i+1) map units
pub(crate) fn panel_with_map(rows: &[Vec<i8>]) -> (GenotypeMatrix, LocusMap) {
    let haps = GenotypeMatrix::from_codes(rows).unwrap();
    let n_loci = haps.n_loci();
    let physical: Vec<i64> = (0..n_loci).map(|i| (i as i64 + 1) * 1_000).collect();
    let genetic: Vec<f64> = (0..n_loci).map(|i| (i as f64 + 1.0) * 0.01).collect();
    let map = LocusMap::from_positions(&physical, &genetic).unwrap();
    (haps, map)
}

/// Eight haplotypes over seven loci, core at locus 3
///
/// Haplotypes 0-3 carry the derived core allele. On both sides each allele
/// class splits into pairs one locus out and into singletons two loci out;
/// loci 0 and 6 are all-ancestral padding.
pub(crate) fn bit_panel() -> (GenotypeMatrix, LocusMap) {
    let pad = [0, 0, 0, 0, 0, 0, 0, 0];
    let b1 = [0, 1, 0, 1, 0, 1, 0, 1];
    let b0 = [0, 0, 1, 1, 0, 0, 1, 1];
    let core = [1, 1, 1, 1, 0, 0, 0, 0];
    let columns = [pad, b1, b0, core, b0, b1, pad];

    let rows: Vec<Vec<i8>> = (0..8)
        .map(|hap| columns.iter().map(|col| col[hap]).collect())
        .collect();
    panel_with_map(&rows)
}

/// One-sided iHH of either allele class of `bit_panel` at the default cutoff
pub(crate) fn bit_panel_ihh() -> f64 {
    // EHH 1 -> 1/3 -> 0 over two 0.01 steps
    0.5 * 0.01 * (1.0 + 1.0 / 3.0) + 0.5 * 0.01 * (1.0 / 3.0)
}

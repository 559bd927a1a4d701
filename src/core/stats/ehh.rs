// ehh.rs - Single-locus EHH curve and haplotype family colors

use crate::core::colors::{ColorGrid, LineageColorer};
use crate::core::decay::ScanParams;
use crate::core::homozygosity::SoftTriplet;
use crate::core::tracker::{Direction, ExtensionTracker};
use crate::data::{GenotypeMatrix, LocusMap};

/// EHH value(s) reported at one offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EhhValues {
    Binary { derived: f64, ancestral: f64 },
    Soft(SoftTriplet),
}

/// One row of the curve, offsets signed relative to the query locus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EhhRow {
    pub physical_offset: i64,
    pub genetic_offset: f64,
    pub values: EhhValues,
}

#[derive(Debug, Clone)]
pub struct EhhCurve {
    /// Ordered by position, the query row included
    pub rows: Vec<EhhRow>,
    /// One row per derived haplotype, one column per row of `rows`
    pub derived_colors: ColorGrid,
    pub ancestral_colors: ColorGrid,
}

impl EhhCurve {
    /// Index of the query row
    pub fn core_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.physical_offset == 0 && row.genetic_offset == 0.0)
    }
}

/// Loci within `window` bp of `query`, as an inclusive index range
fn window_bounds(map: &LocusMap, query: usize, window: i64) -> (usize, usize) {
    let centre = map.physical_pos(query);
    let within = |locus: usize| (map.physical_pos(locus) - centre).abs() <= window;

    let mut first = query;
    while let Some(next) = Direction::Left.next_locus(first, map.len()) {
        if !within(next) {
            break;
        }
        first = next;
    }
    let mut last = query;
    while let Some(next) = Direction::Right.next_locus(last, map.len()) {
        if !within(next) {
            break;
        }
        last = next;
    }
    (first, last)
}

/// EHH decay around one query locus over the whole window
///
/// There is no cutoff or gap check; every locus in the window gets a row.
/// Family colors always follow the derived/ancestral split, even when
/// `soft` asks for the soft-sweep triplet in the rows.
pub fn ehh_curve(
    haps: &GenotypeMatrix,
    map: &LocusMap,
    query: usize,
    params: &ScanParams,
    soft: bool,
) -> Result<EhhCurve, String> {
    if query >= map.len() || query >= haps.n_loci() {
        return Err(format!(
            "Query locus index {} is outside the {} loci loaded",
            query,
            map.len().min(haps.n_loci())
        ));
    }

    let (first, last) = window_bounds(map, query, params.ehh_window);
    let n_cols = last - first + 1;
    let core_col = query - first;

    let seed = ExtensionTracker::seeded(vec![haps], query);
    let (derived, ancestral) = seed.partition_by_allele(query);
    let mut derived_colorer = LineageColorer::new(derived.len(), n_cols, core_col);
    let mut ancestral_colorer = LineageColorer::new(ancestral.len(), n_cols, core_col);

    let core_values = if soft {
        EhhValues::Soft(SoftTriplet::at_core())
    } else {
        EhhValues::Binary {
            derived: 1.0,
            ancestral: 1.0,
        }
    };
    let mut values: Vec<Option<EhhValues>> = vec![None; n_cols];
    values[core_col] = Some(core_values);

    for direction in Direction::BOTH {
        let mut tracker = seed.clone();
        let mut pooled = ExtensionTracker::new(vec![haps]);
        let everyone = pooled.all_members();

        let mut locus = query;
        while let Some(next) = direction.next_locus(locus, map.len()) {
            if next < first || next > last {
                break;
            }
            let col = next - first;
            let previous_col = locus - first;
            tracker.extend(next);

            let derived_groups = tracker.grouping(&derived);
            let ancestral_groups = tracker.grouping(&ancestral);
            derived_colorer.color_step(&derived_groups, col, previous_col);
            ancestral_colorer.color_step(&ancestral_groups, col, previous_col);

            values[col] = Some(if soft {
                pooled.extend(next);
                let groups = pooled.grouping(&everyone);
                EhhValues::Soft(SoftTriplet::from_groups(
                    groups.sizes(),
                    groups.total(),
                    params.soft_k,
                ))
            } else {
                let estimator = params.homozygosity;
                EhhValues::Binary {
                    derived: estimator.estimate(derived_groups.sizes(), derived_groups.total()),
                    ancestral: estimator.estimate(ancestral_groups.sizes(), ancestral_groups.total()),
                }
            });
            locus = next;
        }
    }

    let rows = values
        .into_iter()
        .enumerate()
        .filter_map(|(col, values)| {
            let locus = first + col;
            values.map(|values| EhhRow {
                physical_offset: map.physical_pos(locus) - map.physical_pos(query),
                genetic_offset: map.genetic_pos(locus) - map.genetic_pos(query),
                values,
            })
        })
        .collect();

    Ok(EhhCurve {
        rows,
        derived_colors: derived_colorer.into_grid(),
        ancestral_colors: ancestral_colorer.into_grid(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::colors::UNIQUE_COLOR;
    use crate::test_support::{bit_panel, panel_with_map};
    use approx::assert_relative_eq;

    fn params(window: i64) -> ScanParams {
        ScanParams {
            ehh_window: window,
            ..ScanParams::default()
        }
    }

    fn binary(row: &EhhRow) -> (f64, f64) {
        match row.values {
            EhhValues::Binary { derived, ancestral } => (derived, ancestral),
            EhhValues::Soft(_) => panic!("expected binary values"),
        }
    }

    #[test]
    fn test_window_limits_rows() {
        let (haps, map) = bit_panel();
        let curve = ehh_curve(&haps, &map, 3, &params(2_500), false).unwrap();
        let offsets: Vec<i64> = curve.rows.iter().map(|r| r.physical_offset).collect();
        assert_eq!(offsets, vec![-2_000, -1_000, 0, 1_000, 2_000]);
        assert_eq!(curve.core_row(), Some(2));
        assert_relative_eq!(curve.rows[0].genetic_offset, -0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_core_row_is_one() {
        let (haps, map) = bit_panel();
        let curve = ehh_curve(&haps, &map, 3, &params(100_000), false).unwrap();
        assert_eq!(curve.rows.len(), 7);
        assert_eq!(binary(&curve.rows[3]), (1.0, 1.0));
    }

    #[test]
    fn test_decay_values() {
        let (haps, map) = bit_panel();
        let curve = ehh_curve(&haps, &map, 3, &params(100_000), false).unwrap();
        for (row, expected) in [(2, 1.0 / 3.0), (4, 1.0 / 3.0), (1, 0.0), (5, 0.0), (0, 0.0)] {
            let (derived, ancestral) = binary(&curve.rows[row]);
            assert_relative_eq!(derived, expected, epsilon = 1e-12);
            assert_relative_eq!(ancestral, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_four_haplotype_panel() {
        // derived carriers are haplotypes 1 and 3; both pairs split one step out
        let rows = vec![vec![0, 0, 1], vec![0, 1, 1], vec![1, 0, 0], vec![1, 1, 0]];
        let (haps, map) = panel_with_map(&rows);
        let curve = ehh_curve(&haps, &map, 1, &params(100_000), false).unwrap();

        let offsets: Vec<i64> = curve.rows.iter().map(|r| r.physical_offset).collect();
        assert_eq!(offsets, vec![-1_000, 0, 1_000]);
        assert_eq!(curve.core_row(), Some(1));
        assert_eq!(binary(&curve.rows[1]), (1.0, 1.0));
        assert_eq!(binary(&curve.rows[0]), (0.0, 0.0));
        assert_eq!(binary(&curve.rows[2]), (0.0, 0.0));
        assert_eq!(curve.derived_colors.row(0), &[UNIQUE_COLOR, 0, UNIQUE_COLOR]);
    }

    #[test]
    fn test_unsplit_derived_pair_stays_at_one() {
        let rows = vec![vec![0, 0, 1], vec![1, 1, 0], vec![1, 0, 0], vec![1, 1, 0]];
        let (haps, map) = panel_with_map(&rows);
        let curve = ehh_curve(&haps, &map, 1, &params(100_000), false).unwrap();

        for row in &curve.rows {
            let (derived, _) = binary(row);
            assert_eq!(derived, 1.0);
        }
        assert_eq!(binary(&curve.rows[0]).1, 0.0);
        assert_eq!(binary(&curve.rows[2]).1, 0.0);
        assert_eq!(curve.derived_colors.row(0), &[0, 0, 0]);
        assert_eq!(curve.derived_colors.row(1), &[0, 0, 0]);
        assert_eq!(curve.ancestral_colors.row(1), &[UNIQUE_COLOR, 0, UNIQUE_COLOR]);
    }

    #[test]
    fn test_scan_reaches_window_not_cutoff() {
        // no decay at all: a cutoff-driven scan would hit the edge, the curve does not care
        let rows = vec![vec![1, 1, 1], vec![1, 1, 1], vec![0, 0, 0], vec![0, 0, 0]];
        let (haps, map) = panel_with_map(&rows);
        let curve = ehh_curve(&haps, &map, 1, &params(100_000), false).unwrap();
        assert_eq!(curve.rows.len(), 3);
        for row in &curve.rows {
            assert_eq!(binary(row), (1.0, 1.0));
        }
    }

    #[test]
    fn test_family_colors() {
        let (haps, map) = bit_panel();
        let curve = ehh_curve(&haps, &map, 3, &params(2_500), false).unwrap();
        let colors = &curve.derived_colors;
        assert_eq!(colors.n_rows(), 4);
        assert_eq!(colors.n_cols(), 5);
        assert_eq!(colors.row(0), &[UNIQUE_COLOR, 0, 0, 0, UNIQUE_COLOR]);
        // colors keep counting up on the right-hand side
        assert_eq!(colors.row(2), &[UNIQUE_COLOR, 1, 0, 2, UNIQUE_COLOR]);
        assert_eq!(curve.ancestral_colors.row(3), &[UNIQUE_COLOR, 1, 0, 2, UNIQUE_COLOR]);
    }

    #[test]
    fn test_soft_rows() {
        let (haps, map) = bit_panel();
        let curve = ehh_curve(&haps, &map, 3, &params(2_500), true).unwrap();
        assert_eq!(curve.rows[2].values, EhhValues::Soft(SoftTriplet::at_core()));
        match curve.rows[1].values {
            EhhValues::Soft(t) => {
                assert_relative_eq!(t.h1, 12.0 / 28.0, epsilon = 1e-12);
                assert_relative_eq!(t.h12, 1.0, epsilon = 1e-12);
                assert_relative_eq!(t.h2_over_h1, 0.5, epsilon = 1e-12);
            }
            EhhValues::Binary { .. } => panic!("expected soft values"),
        }
        // colors still come from the allele split
        assert_eq!(curve.derived_colors.n_rows(), 4);
    }

    #[test]
    fn test_query_out_of_range() {
        let (haps, map) = bit_panel();
        assert!(ehh_curve(&haps, &map, 7, &params(1_000), false).is_err());
    }
}

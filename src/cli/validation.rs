// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::{Homozygosity, ScanParams};
use crate::data::{GenotypeMatrix, LocusMap};

/// Statistic selected for the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatisticMode {
    /// Single-locus curve around a named locus
    Ehh { query: String, soft: bool },
    Ihs,
    XpEhh,
    Soft,
}

impl StatisticMode {
    /// Tag used in output file names
    pub fn file_tag(&self) -> String {
        match self {
            StatisticMode::Ehh { query, .. } => format!("ehh.{}", query),
            StatisticMode::Ihs => "ihs".to_string(),
            StatisticMode::XpEhh => "xpehh".to_string(),
            StatisticMode::Soft => "soft".to_string(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatisticMode::Ehh { soft: false, .. } => "EHH",
            StatisticMode::Ehh { soft: true, .. } => "EHH (soft-sweep statistics)",
            StatisticMode::Ihs => "iHS",
            StatisticMode::XpEhh => "XP-EHH",
            StatisticMode::Soft => "soft-sweep h1/h12/h2÷h1",
        }
    }
}

pub struct ValidationResult {
    pub mode: StatisticMode,
    pub params: ScanParams,
    pub threads: usize,
    pub hap_path: String,
    pub ref_path: Option<String>,
    pub map_path: String,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Exactly one statistic
    let selected = [args.ehh.is_some(), args.ihs, args.xpehh, args.soft]
        .iter()
        .filter(|&&on| on)
        .count();
    if selected != 1 {
        return Err(format!(
            "Select exactly one of --ehh, --ihs, --xpehh, --soft ({} given)",
            selected
        ));
    }

    let mode = if let Some(query) = &args.ehh {
        StatisticMode::Ehh {
            query: query.clone(),
            soft: args.ehh_soft,
        }
    } else if args.ihs {
        StatisticMode::Ihs
    } else if args.xpehh {
        StatisticMode::XpEhh
    } else {
        StatisticMode::Soft
    };

    if args.ehh_soft && args.ehh.is_none() {
        return Err("--ehh-soft is only valid together with --ehh".to_string());
    }

    // Inputs
    let hap_path = args
        .hap
        .clone()
        .ok_or_else(|| "--hap is required".to_string())?;
    let map_path = args
        .map
        .clone()
        .ok_or_else(|| "--map is required".to_string())?;
    match (&mode, &args.ref_hap) {
        (StatisticMode::XpEhh, None) => {
            return Err("--xpehh requires a second population via --ref".to_string())
        }
        (StatisticMode::XpEhh, Some(_)) => {}
        (_, Some(_)) => return Err("--ref is only valid with --xpehh".to_string()),
        (_, None) => {}
    }

    // Numeric ranges
    if args.threads < 1 {
        return Err("--threads must be at least 1".to_string());
    }
    if args.gap_scale < 1 {
        return Err("--gap-scale must be at least 1 bp".to_string());
    }
    if args.max_gap < 1 {
        return Err("--max-gap must be at least 1 bp".to_string());
    }
    if !(args.cutoff > 0.0 && args.cutoff < 1.0) {
        return Err("EHH cutoff must be strictly between 0.0 and 1.0".to_string());
    }
    if !(0.0..=0.5).contains(&args.maf) {
        return Err("MAF must be between 0.0 and 0.5".to_string());
    }
    if args.ehh1k < 1 {
        return Err("--ehh1k must be at least 1".to_string());
    }
    if args.ehh_win < 1 {
        return Err("--ehh-win must be at least 1 bp".to_string());
    }

    let params = ScanParams {
        ehh_cutoff: args.cutoff,
        max_gap: args.max_gap,
        gap_scale: args.gap_scale,
        homozygosity: Homozygosity::from_alt_flag(args.alt),
        maf: args.maf,
        soft_k: args.ehh1k,
        ehh_window: args.ehh_win,
    };

    Ok(ValidationResult {
        mode,
        params,
        threads: args.threads,
        hap_path,
        ref_path: args.ref_hap.clone(),
        map_path,
    })
}

/// Check that loaded inputs describe the same loci
pub fn check_dimensions(
    haps: &GenotypeMatrix,
    reference: Option<&GenotypeMatrix>,
    map: &LocusMap,
) -> Result<(), String> {
    if let Some(reference) = reference {
        if reference.n_loci() != haps.n_loci() {
            return Err(format!(
                "Haplotype files disagree: {} loci in --hap but {} in --ref",
                haps.n_loci(),
                reference.n_loci()
            ));
        }
    }
    if map.len() != haps.n_loci() {
        return Err(format!(
            "Map has {} loci but the haplotype file has {}",
            map.len(),
            haps.n_loci()
        ));
    }
    Ok(())
}

/// Index of the --ehh query locus, which must be polymorphic and pass the MAF floor
pub fn locate_query(
    haps: &GenotypeMatrix,
    map: &LocusMap,
    query: &str,
    params: &ScanParams,
) -> Result<usize, String> {
    let locus = map
        .find(query)
        .ok_or_else(|| format!("Locus '{}' not found in the map", query))?;
    let freq = haps
        .allele_frequency(locus)
        .ok_or_else(|| format!("Locus '{}' has no called alleles", query))?;
    if freq == 0.0 || freq == 1.0 {
        return Err(format!("Locus '{}' is monomorphic", query));
    }
    if params.below_maf(freq) {
        return Err(format!(
            "Locus '{}' has MAF {:.4} below the floor of {}",
            query,
            freq.min(1.0 - freq),
            params.maf
        ));
    }
    Ok(locus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bit_panel;

    fn validate(argv: &[&str]) -> Result<ValidationResult, String> {
        validate_args(&Args::parse_from(argv).unwrap())
    }

    #[test]
    fn test_single_mode_required() {
        assert!(validate(&["--hap", "a", "--map", "m"]).is_err());
        assert!(validate(&["--hap", "a", "--map", "m", "--ihs", "--soft"]).is_err());
        let ok = validate(&["--hap", "a", "--map", "m", "--soft"]).unwrap();
        assert_eq!(ok.mode, StatisticMode::Soft);
        assert_eq!(ok.params.homozygosity, Homozygosity::Standard);
    }

    #[test]
    fn test_ref_only_with_xpehh() {
        assert!(validate(&["--hap", "a", "--map", "m", "--xpehh"]).is_err());
        assert!(validate(&["--hap", "a", "--map", "m", "--ihs", "--ref", "b"]).is_err());
        let ok = validate(&["--hap", "a", "--map", "m", "--xpehh", "--ref", "b"]).unwrap();
        assert_eq!(ok.ref_path.as_deref(), Some("b"));
    }

    #[test]
    fn test_parameter_ranges() {
        let base = ["--hap", "a", "--map", "m", "--ihs"];
        for bad in [
            &["--cutoff", "1.0"][..],
            &["--cutoff", "0"][..],
            &["--maf", "0.6"][..],
            &["--threads", "0"][..],
            &["--gap-scale", "0"][..],
            &["--max-gap", "0"][..],
            &["--ehh1k", "0"][..],
        ] {
            let argv: Vec<&str> = base.iter().chain(bad.iter()).copied().collect();
            assert!(validate(&argv).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_ehh_soft_needs_ehh() {
        assert!(validate(&["--hap", "a", "--map", "m", "--ihs", "--ehh-soft"]).is_err());
        let ok = validate(&["--hap", "a", "--map", "m", "--ehh", "rs1", "--ehh-soft", "--alt"]).unwrap();
        assert_eq!(
            ok.mode,
            StatisticMode::Ehh {
                query: "rs1".to_string(),
                soft: true
            }
        );
        assert_eq!(ok.mode.file_tag(), "ehh.rs1");
        assert_eq!(ok.params.homozygosity, Homozygosity::Alternate);
    }

    #[test]
    fn test_dimension_mismatch() {
        let (haps, map) = bit_panel();
        assert!(check_dimensions(&haps, Some(&haps), &map).is_ok());
        let short = GenotypeMatrix::from_codes(&[vec![0, 1], vec![1, 0]]).unwrap();
        assert!(check_dimensions(&haps, Some(&short), &map).is_err());
        assert!(check_dimensions(&short, None, &map).is_err());
    }

    #[test]
    fn test_locate_query() {
        let (haps, map) = bit_panel();
        let params = ScanParams::default();
        assert_eq!(locate_query(&haps, &map, "locus_3", &params), Ok(3));
        assert!(locate_query(&haps, &map, "rs404", &params).unwrap_err().contains("not found"));
        assert!(locate_query(&haps, &map, "locus_0", &params).unwrap_err().contains("monomorphic"));
    }

    #[test]
    fn test_query_below_maf() {
        let mut rows = vec![vec![0, 0]; 20];
        rows[0][1] = 1;
        let haps = GenotypeMatrix::from_codes(&rows).unwrap();
        let map = LocusMap::from_positions(&[100, 200], &[0.0, 0.1]).unwrap();
        let params = ScanParams {
            maf: 0.1,
            ..ScanParams::default()
        };
        assert!(locate_query(&haps, &map, "locus_1", &params).unwrap_err().contains("MAF"));
    }
}

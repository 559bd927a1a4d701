// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;

use ehhscan::cli::{check_dimensions, locate_query, Config, StatisticMode};
use ehhscan::output::{
    write_colormap, write_ehh_curve, write_ihs, write_soft, write_xpehh, OutputFiles, OutputPaths,
};
use ehhscan::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    // Validate all arguments before touching any file
    let validation = validate_args(&args)?;
    let params = &validation.params;

    println!("🚀 ehhscan v{}", env!("CARGO_PKG_VERSION"));
    println!("📊 Statistic: {}", validation.mode.label());
    println!("🧮 Homozygosity: {}", params.homozygosity.description());

    let total_start = Instant::now();

    // Load inputs
    let haps = GenotypeMatrix::from_hap_file(Path::new(&validation.hap_path))?;
    let reference = match &validation.ref_path {
        Some(path) => Some(GenotypeMatrix::from_hap_file(Path::new(path))?),
        None => None,
    };
    let map = LocusMap::from_map_file(Path::new(&validation.map_path))?;
    check_dimensions(&haps, reference.as_ref(), &map)?;

    let query = match &validation.mode {
        StatisticMode::Ehh { query, .. } => Some(locate_query(&haps, &map, query, params)?),
        _ => None,
    };

    // Open every output before any computation starts
    let paths = OutputPaths::new(
        &args.out,
        &validation.mode.file_tag(),
        params.homozygosity == Homozygosity::Alternate,
    );
    let OutputFiles {
        results: mut out,
        colormaps,
        log,
    } = paths.open(query.is_some())?;
    write_log_header(&log, &command_line, &validation)?;

    let compute_start = Instant::now();

    match &validation.mode {
        StatisticMode::Ehh { soft, .. } => {
            let query = query.ok_or("EHH query locus was not resolved")?;
            println!("🎯 Query locus: {} ({} bp)", map.name(query), map.physical_pos(query));
            let (mut derived, mut ancestral) =
                colormaps.ok_or("EHH color maps were not opened")?;
            let curve = ehh_curve(&haps, &map, query, params, *soft)?;
            write_ehh_curve(&mut out, &curve)?;
            write_colormap(&mut derived, &curve.derived_colors)?;
            write_colormap(&mut ancestral, &curve.ancestral_colors)?;
            println!(
                "🎨 Color maps written to: {}, {}",
                paths.derived_colormap().display(),
                paths.ancestral_colormap().display()
            );
        }
        StatisticMode::Ihs => {
            let (partition, progress) = prepare_scan(map.len(), validation.threads, &log);
            let results = scan_ihs(&haps, &map, params, &partition, &log, &progress)?;
            report_coverage(&results);
            write_ihs(&mut out, &map, &results)?;
        }
        StatisticMode::XpEhh => {
            let reference = reference
                .as_ref()
                .ok_or("XP-EHH requires a reference population")?;
            let (partition, progress) = prepare_scan(map.len(), validation.threads, &log);
            let results = scan_xpehh(&haps, reference, &map, params, &partition, &log, &progress)?;
            report_coverage(&results);
            write_xpehh(&mut out, &map, &results)?;
        }
        StatisticMode::Soft => {
            let (partition, progress) = prepare_scan(map.len(), validation.threads, &log);
            let results = scan_soft(&haps, &map, params, &partition, &log, &progress)?;
            report_coverage(&results);
            write_soft(&mut out, &map, &results)?;
        }
    }

    log.flush()?;

    println!("⏱️  Computation: {:.2?}", compute_start.elapsed());
    println!("✅ Total time: {:.2?}", total_start.elapsed());
    println!("📄 Results written to: {}", paths.results.display());
    println!("📄 Log written to: {}", paths.log.display());
    Ok(())
}

/// Command line, timestamp and resolved settings at the top of the run log
fn write_log_header(
    log: &RunLog,
    command_line: &str,
    validation: &ValidationResult,
) -> Result<(), String> {
    let params = &validation.params;
    log.record(&format!("ehhscan v{}", env!("CARGO_PKG_VERSION")))?;
    log.record(&format!("Command: {}", command_line))?;
    log.record(&format!(
        "Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ))?;
    log.record(&format!("Statistic: {}", validation.mode.label()))?;
    log.record(&format!("Haplotypes: {}", validation.hap_path))?;
    if let Some(reference) = &validation.ref_path {
        log.record(&format!("Reference haplotypes: {}", reference))?;
    }
    log.record(&format!("Map: {}", validation.map_path))?;
    log.record(&format!("Threads: {}", validation.threads))?;
    log.record(&format!("EHH cutoff: {}", params.ehh_cutoff))?;
    log.record(&format!("Max gap: {}", params.max_gap))?;
    log.record(&format!("Gap scale: {}", params.gap_scale))?;
    log.record(&format!("MAF: {}", params.maf))?;
    log.record(&format!("Homozygosity: {}", params.homozygosity.description()))?;
    if let StatisticMode::Ehh { .. } = validation.mode {
        log.record(&format!("EHH window: {}", params.ehh_window))?;
    }
    if matches!(validation.mode, StatisticMode::Soft | StatisticMode::Ehh { soft: true, .. }) {
        log.record(&format!("Soft-sweep k: {}", params.soft_k))?;
    }
    Ok(())
}

/// Split loci over the requested threads, warning when the count is clamped
fn prepare_scan(n_loci: usize, threads: usize, log: &RunLog) -> (Partition, ScanProgress) {
    let partition = Partition::new(n_loci, threads);
    if partition.was_clamped() {
        let warning =
            "WARNING: there are fewer loci than threads requested. Running with 1 thread instead.";
        eprintln!("⚠️  {}", warning);
        log.warn(warning);
    }
    println!(
        "🧵 Threads: {} ({} loci per block)",
        partition.n_threads(),
        partition.blocks().first().map(|b| b.len()).unwrap_or(0)
    );
    (partition, ScanProgress::new(n_loci))
}

fn report_coverage<R>(results: &[Option<R>]) {
    let computed = results.iter().filter(|r| r.is_some()).count();
    println!(
        "📊 Computed {} of {} loci ({} skipped, see log)",
        computed,
        results.len(),
        results.len() - computed
    );
}

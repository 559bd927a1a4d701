// mod.rs - Result writers

pub mod log;

pub use log::RunLog;

use std::fs::{create_dir_all, remove_file, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::core::{ColorGrid, EhhCurve, EhhValues, IhsLocus, SoftLocus, XpLocus};
use crate::data::LocusMap;

/// Ensure parent directory exists before creating file
pub(crate) fn ensure_parent_dir(file_path: &Path) -> Result<(), String> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                format!("Failed to create parent directory '{}': {}", parent.display(), e)
            })?;
        }
    }
    Ok(())
}

/// Files produced by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub results: PathBuf,
    pub log: PathBuf,
}

/// Every output of a run, opened and ready for writing
pub struct OutputFiles {
    pub results: Writer<File>,
    /// (derived, ancestral) color maps, single-locus runs only
    pub colormaps: Option<(Writer<File>, Writer<File>)>,
    pub log: RunLog,
}

impl OutputPaths {
    /// `<basename>.<tag>[.alt].out` and the matching `.log`
    pub fn new(basename: &str, tag: &str, alt: bool) -> Self {
        let stem = if alt {
            format!("{}.{}.alt", basename, tag)
        } else {
            format!("{}.{}", basename, tag)
        };
        Self {
            results: PathBuf::from(format!("{}.out", stem)),
            log: PathBuf::from(format!("{}.log", stem)),
        }
    }

    pub fn derived_colormap(&self) -> PathBuf {
        PathBuf::from(format!("{}.der.colormap", self.results.display()))
    }

    pub fn ancestral_colormap(&self) -> PathBuf {
        PathBuf::from(format!("{}.anc.colormap", self.results.display()))
    }

    /// Open the result file, the color maps when asked for, then the log.
    /// If any of them fails, the files already created are removed again.
    pub fn open(&self, with_colormaps: bool) -> Result<OutputFiles, String> {
        let mut created = Vec::new();
        let opened = self.open_all(with_colormaps, &mut created);
        if opened.is_err() {
            for path in &created {
                let _ = remove_file(path);
            }
        }
        opened
    }

    fn open_all(&self, with_colormaps: bool, created: &mut Vec<PathBuf>) -> Result<OutputFiles, String> {
        let results = tab_writer(&self.results)?;
        created.push(self.results.clone());

        let colormaps = if with_colormaps {
            let derived = space_writer(&self.derived_colormap())?;
            created.push(self.derived_colormap());
            let ancestral = space_writer(&self.ancestral_colormap())?;
            created.push(self.ancestral_colormap());
            Some((derived, ancestral))
        } else {
            None
        };

        let log = RunLog::create(&self.log)?;
        Ok(OutputFiles {
            results,
            colormaps,
            log,
        })
    }
}

fn delimited_writer(path: &Path, delimiter: u8) -> Result<Writer<File>, String> {
    ensure_parent_dir(path)?;
    WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create output file '{}': {}", path.display(), e))
}

/// Tab-delimited result file
pub fn tab_writer(path: &Path) -> Result<Writer<File>, String> {
    delimited_writer(path, b'\t')
}

/// Space-delimited color map file
pub fn space_writer(path: &Path) -> Result<Writer<File>, String> {
    delimited_writer(path, b' ')
}

fn write_row<W: Write>(writer: &mut Writer<W>, row: &[String]) -> Result<(), String> {
    writer
        .write_record(row)
        .map_err(|e| format!("Write error: {}", e))
}

fn flush<W: Write>(writer: &mut Writer<W>) -> Result<(), String> {
    writer.flush().map_err(|e| format!("Flush error: {}", e))
}

/// Write iHS rows; loci without a finite score are left out
pub fn write_ihs<W: Write>(
    writer: &mut Writer<W>,
    map: &LocusMap,
    results: &[Option<IhsLocus>],
) -> Result<usize, String> {
    let mut written = 0;

    for (locus, result) in results.iter().enumerate() {
        let Some(result) = result else { continue };
        let Some(ihs) = result.ihs() else { continue };
        write_row(
            writer,
            &[
                map.name(locus).to_string(),
                map.physical_pos(locus).to_string(),
                result.freq.to_string(),
                result.ihh_derived.to_string(),
                result.ihh_ancestral.to_string(),
                ihs.to_string(),
            ],
        )?;
        written += 1;
    }

    flush(writer)?;
    println!("✅ iHS results written ({} loci)", written);
    Ok(written)
}

/// Write XP-EHH rows with a header line
pub fn write_xpehh<W: Write>(
    writer: &mut Writer<W>,
    map: &LocusMap,
    results: &[Option<XpLocus>],
) -> Result<usize, String> {
    let header = ["id", "pos", "gpos", "p1", "ihh1", "p2", "ihh2", "xpehh"];
    write_row(writer, &header.map(String::from))?;
    let mut written = 0;

    for (locus, result) in results.iter().enumerate() {
        let Some(result) = result else { continue };
        let Some(xpehh) = result.xpehh() else { continue };
        write_row(
            writer,
            &[
                map.name(locus).to_string(),
                map.physical_pos(locus).to_string(),
                map.genetic_pos(locus).to_string(),
                result.freq1.to_string(),
                result.ihh1.to_string(),
                result.freq2.to_string(),
                result.ihh2.to_string(),
                xpehh.to_string(),
            ],
        )?;
        written += 1;
    }

    flush(writer)?;
    println!("✅ XP-EHH results written ({} loci)", written);
    Ok(written)
}

/// Write soft-sweep rows; loci with a non-finite value are left out
pub fn write_soft<W: Write>(
    writer: &mut Writer<W>,
    map: &LocusMap,
    results: &[Option<SoftLocus>],
) -> Result<usize, String> {
    let mut written = 0;

    for (locus, result) in results.iter().enumerate() {
        let Some(result) = result else { continue };
        let values = [result.freq, result.h1, result.h12, result.h2_over_h1];
        if values.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let mut row = vec![map.name(locus).to_string(), map.physical_pos(locus).to_string()];
        row.extend(values.iter().map(|v| v.to_string()));
        write_row(writer, &row)?;
        written += 1;
    }

    flush(writer)?;
    println!("✅ Soft-sweep results written ({} loci)", written);
    Ok(written)
}

/// Write a single-locus curve with six decimals per value
pub fn write_ehh_curve<W: Write>(writer: &mut Writer<W>, curve: &EhhCurve) -> Result<(), String> {
    for row in &curve.rows {
        let mut fields = vec![
            row.physical_offset.to_string(),
            format!("{:.6}", row.genetic_offset),
        ];
        match row.values {
            EhhValues::Binary { derived, ancestral } => {
                fields.push(format!("{:.6}", derived));
                fields.push(format!("{:.6}", ancestral));
            }
            EhhValues::Soft(t) => {
                fields.push(format!("{:.6}", t.h1));
                fields.push(format!("{:.6}", t.h12));
                fields.push(format!("{:.6}", t.h2_over_h1_or_zero()));
            }
        }
        write_row(writer, &fields)?;
    }

    flush(writer)?;
    println!("✅ EHH curve written ({} rows)", curve.rows.len());
    Ok(())
}

/// Write a color grid, one row per haplotype
pub fn write_colormap<W: Write>(writer: &mut Writer<W>, grid: &ColorGrid) -> Result<(), String> {
    for row in grid.rows() {
        let fields: Vec<String> = row.iter().map(|color| color.to_string()).collect();
        write_row(writer, &fields)?;
    }
    flush(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ehh_curve, ScanParams};
    use crate::test_support::bit_panel;
    use tempfile::tempdir;

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new("run/out", "ihs", false);
        assert_eq!(paths.results, PathBuf::from("run/out.ihs.out"));
        assert_eq!(paths.log, PathBuf::from("run/out.ihs.log"));

        let alt = OutputPaths::new("out", "ehh.rs42", true);
        assert_eq!(alt.results, PathBuf::from("out.ehh.rs42.alt.out"));
        assert_eq!(alt.log, PathBuf::from("out.ehh.rs42.alt.log"));
        assert_eq!(alt.derived_colormap(), PathBuf::from("out.ehh.rs42.alt.out.der.colormap"));
        assert_eq!(alt.ancestral_colormap(), PathBuf::from("out.ehh.rs42.alt.out.anc.colormap"));
    }

    #[test]
    fn test_ihs_rows_skip_missing_and_zero() {
        let (_, map) = bit_panel();
        let mut results = vec![None; map.len()];
        results[2] = Some(IhsLocus {
            freq: 0.5,
            ihh_derived: 0.2,
            ihh_ancestral: 0.1,
        });
        results[4] = Some(IhsLocus {
            freq: 0.5,
            ihh_derived: 0.0,
            ihh_ancestral: 0.1,
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.ihs.out");
        let mut writer = tab_writer(&path).unwrap();
        assert_eq!(write_ihs(&mut writer, &map, &results).unwrap(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let fields: Vec<&str> = text.trim_end().split('\t').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "locus_2");
        assert_eq!(fields[1], "3000");
        let ihs: f64 = fields[5].parse().unwrap();
        assert!((ihs - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_xpehh_header_and_rows() {
        let (_, map) = bit_panel();
        let mut results = vec![None; map.len()];
        results[3] = Some(XpLocus {
            freq1: 0.5,
            ihh1: 0.3,
            freq2: 0.25,
            ihh2: 0.3,
        });
        results[5] = Some(XpLocus {
            freq1: 0.5,
            ihh1: 0.3,
            freq2: 0.25,
            ihh2: 0.0,
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xpehh.out");
        let mut writer = tab_writer(&path).unwrap();
        assert_eq!(write_xpehh(&mut writer, &map, &results).unwrap(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id\tpos\tgpos\tp1\tihh1\tp2\tihh2\txpehh");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("locus_3\t4000\t0.04\t0.5\t0.3\t0.25\t0.3\t"));
        assert!(lines[1].ends_with("\t0"));
    }

    #[test]
    fn test_soft_rows_skip_non_finite() {
        let (_, map) = bit_panel();
        let mut results = vec![None; map.len()];
        results[1] = Some(SoftLocus {
            freq: 0.5,
            h1: 0.1,
            h12: 0.2,
            h2_over_h1: f64::NAN,
        });
        results[3] = Some(SoftLocus {
            freq: 0.5,
            h1: 0.1,
            h12: 0.2,
            h2_over_h1: 0.3,
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out.soft.out");
        let mut writer = tab_writer(&path).unwrap();
        assert_eq!(write_soft(&mut writer, &map, &results).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "locus_3\t4000\t0.5\t0.1\t0.2\t0.3\n");
    }

    #[test]
    fn test_curve_and_colormaps() {
        let (haps, map) = bit_panel();
        let params = ScanParams {
            ehh_window: 1_000,
            ..ScanParams::default()
        };
        let curve = ehh_curve(&haps, &map, 3, &params, false).unwrap();

        let dir = tempdir().unwrap();
        let paths = OutputPaths::new(dir.path().join("out").to_str().unwrap(), "ehh.locus_3", false);
        let mut files = paths.open(true).unwrap();
        write_ehh_curve(&mut files.results, &curve).unwrap();
        let (derived, _) = files.colormaps.as_mut().unwrap();
        write_colormap(derived, &curve.derived_colors).unwrap();

        let text = std::fs::read_to_string(&paths.results).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "-1000\t-0.010000\t0.333333\t0.333333",
                "0\t0.000000\t1.000000\t1.000000",
                "1000\t0.010000\t0.333333\t0.333333",
            ]
        );

        let colors = std::fs::read_to_string(paths.derived_colormap()).unwrap();
        assert_eq!(colors.lines().next(), Some("0 0 0"));
        assert_eq!(colors.lines().nth(2), Some("1 0 2"));
    }

    #[test]
    fn test_open_creates_every_file_up_front() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("sub/dir/run");
        let paths = OutputPaths::new(base.to_str().unwrap(), "ehh.rs7", false);
        let files = paths.open(true).unwrap();
        assert!(files.colormaps.is_some());
        assert!(paths.results.exists());
        assert!(paths.log.exists());
        assert!(paths.derived_colormap().exists());
        assert!(paths.ancestral_colormap().exists());

        let genome_wide = OutputPaths::new(base.to_str().unwrap(), "ihs", false);
        assert!(genome_wide.open(false).unwrap().colormaps.is_none());
        assert!(!genome_wide.derived_colormap().exists());
    }

    #[test]
    fn test_unwritable_results_leave_nothing_behind() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::new(dir.path().join("run").to_str().unwrap(), "ihs", false);
        std::fs::create_dir(&paths.results).unwrap();

        let err = paths.open(false).err().unwrap();
        assert!(err.contains("Failed to create output file"));
        assert!(!paths.log.exists());
    }

    #[test]
    fn test_unwritable_log_removes_opened_files() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::new(dir.path().join("run").to_str().unwrap(), "ehh.rs7", true);
        std::fs::create_dir(&paths.log).unwrap();

        assert!(paths.open(true).is_err());
        assert!(!paths.results.exists());
        assert!(!paths.derived_colormap().exists());
        assert!(!paths.ancestral_colormap().exists());
    }
}

// hap.rs - Haplotype file loader (one row per haplotype, one column per locus)

use crate::data::genotype::{Allele, GenotypeMatrix};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse one allele token; `-9` and `.` mark a missing call
fn parse_allele(token: &str) -> Result<Allele, String> {
    match token {
        "0" => Ok(Allele::Ancestral),
        "1" => Ok(Allele::Derived),
        "-9" | "." => Ok(Allele::Missing),
        _ => Err(format!("'{}' is not a 0/1 allele", token)),
    }
}

impl GenotypeMatrix {
    /// Load a whitespace-separated haplotype file
    pub fn from_hap_file(file_path: &Path) -> Result<Self, String> {
        let file = File::open(file_path).map_err(|e| {
            format!(
                "Failed to open haplotype file '{}': {}",
                file_path.display(),
                e
            )
        })?;
        let reader = BufReader::new(file);

        let mut rows: Vec<Vec<Allele>> = Vec::new();
        let mut expected_loci: Option<usize> = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let row = line
                .split_whitespace()
                .enumerate()
                .map(|(col, token)| {
                    parse_allele(token).map_err(|e| {
                        format!(
                            "Invalid allele at line {} column {} of '{}': {}",
                            line_num + 1,
                            col + 1,
                            file_path.display(),
                            e
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            match expected_loci {
                None => expected_loci = Some(row.len()),
                Some(n) if n != row.len() => {
                    return Err(format!(
                        "Line {} of '{}' has {} loci, expected {}",
                        line_num + 1,
                        file_path.display(),
                        row.len(),
                        n
                    ));
                }
                Some(_) => {}
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(format!("Haplotype file '{}' is empty", file_path.display()));
        }

        let matrix = Self::from_rows(rows)?;
        println!(
            "✅ Haplotypes loaded: {} haplotypes, {} loci",
            matrix.n_haplotypes(),
            matrix.n_loci()
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_hap_file() {
        let file = write_temp("0 1 1\n1 0 -9\n\n1 1 .\n");
        let matrix = GenotypeMatrix::from_hap_file(file.path()).unwrap();
        assert_eq!(matrix.n_haplotypes(), 3);
        assert_eq!(matrix.n_loci(), 3);
        assert_eq!(matrix.allele(2, 2), Allele::Missing);
        assert_eq!(matrix.allele(1, 0), Allele::Derived);
    }

    #[test]
    fn test_bad_token_reports_position() {
        let file = write_temp("0 1\n0 2\n");
        let err = GenotypeMatrix::from_hap_file(file.path()).unwrap_err();
        assert!(err.contains("line 2 column 2"), "{}", err);
    }

    #[test]
    fn test_ragged_file_rejected() {
        let file = write_temp("0 1 0\n0 1\n");
        assert!(GenotypeMatrix::from_hap_file(file.path()).is_err());
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = write_temp("\n");
        assert!(GenotypeMatrix::from_hap_file(file.path()).is_err());
    }
}

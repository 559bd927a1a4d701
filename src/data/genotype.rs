// genotype.rs - Haplotype-by-locus allele matrix

/// Allele state at a biallelic site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Allele {
    /// Coded `0`
    Ancestral,
    /// Coded `1`
    Derived,
    /// Missing call marker
    Missing,
}

impl Allele {
    /// Create from the integer coding used by haplotype files (0, 1, -9)
    pub fn from_code(code: i8) -> Result<Self, String> {
        match code {
            0 => Ok(Allele::Ancestral),
            1 => Ok(Allele::Derived),
            -9 => Ok(Allele::Missing),
            other => Err(format!(
                "Allele code {} is not biallelic (expected 0, 1 or -9)",
                other
            )),
        }
    }
}

/// Immutable matrix of haplotypes (rows) by loci (columns)
///
/// Stored locus-major so that a scan step, which reads one locus across
/// every haplotype, touches a contiguous slice.
#[derive(Debug, Clone)]
pub struct GenotypeMatrix {
    n_haplotypes: usize,
    n_loci: usize,
    alleles: Vec<Allele>,
}

impl GenotypeMatrix {
    /// Build from haplotype rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<Allele>>) -> Result<Self, String> {
        let n_haplotypes = rows.len();
        let n_loci = rows.first().map(|r| r.len()).unwrap_or(0);

        for (hap, row) in rows.iter().enumerate() {
            if row.len() != n_loci {
                return Err(format!(
                    "Haplotype {} has {} loci, expected {}",
                    hap + 1,
                    row.len(),
                    n_loci
                ));
            }
        }

        let mut alleles = vec![Allele::Missing; n_haplotypes * n_loci];
        for (hap, row) in rows.iter().enumerate() {
            for (locus, &allele) in row.iter().enumerate() {
                alleles[locus * n_haplotypes + hap] = allele;
            }
        }

        Ok(Self {
            n_haplotypes,
            n_loci,
            alleles,
        })
    }

    /// Build from integer-coded rows (0, 1, -9)
    pub fn from_codes(rows: &[Vec<i8>]) -> Result<Self, String> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(hap, row)| {
                row.iter()
                    .map(|&code| Allele::from_code(code))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| format!("Haplotype {}: {}", hap + 1, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    pub fn n_haplotypes(&self) -> usize {
        self.n_haplotypes
    }

    pub fn n_loci(&self) -> usize {
        self.n_loci
    }

    pub fn allele(&self, haplotype: usize, locus: usize) -> Allele {
        self.alleles[locus * self.n_haplotypes + haplotype]
    }

    /// All haplotypes' alleles at one locus
    pub fn column(&self, locus: usize) -> &[Allele] {
        let start = locus * self.n_haplotypes;
        &self.alleles[start..start + self.n_haplotypes]
    }

    /// (derived, called) counts at a locus; missing calls are not counted
    pub fn allele_counts(&self, locus: usize) -> (usize, usize) {
        self.column(locus)
            .iter()
            .fold((0, 0), |(derived, called), allele| match allele {
                Allele::Derived => (derived + 1, called + 1),
                Allele::Ancestral => (derived, called + 1),
                Allele::Missing => (derived, called),
            })
    }

    /// Derived allele frequency among called haplotypes, `None` if nothing was called
    pub fn allele_frequency(&self, locus: usize) -> Option<f64> {
        let (derived, called) = self.allele_counts(locus);
        if called == 0 {
            None
        } else {
            Some(derived as f64 / called as f64)
        }
    }
}

// homozygosity.rs - Haplotype homozygosity estimators

/// Number of unordered pairs among `n` items, C(n, 2)
fn pairs(n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        (n * (n - 1)) as f64 / 2.0
    }
}

/// Fraction of all pairs in a subset of `total` that fall inside one group of `size`
fn pair_fraction(size: usize, total: usize) -> f64 {
    if size < 2 || total < 2 {
        0.0
    } else {
        pairs(size) / pairs(total)
    }
}

/// Homozygosity estimator variant, resolved once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Homozygosity {
    /// Σ C(nᵢ,2) / C(N,2): unbiased probability that two haplotypes drawn
    /// without replacement are identical
    #[default]
    Standard,
    /// Σ (nᵢ/N)²: sum of squared haplotype frequencies
    Alternate,
}

impl Homozygosity {
    pub fn from_alt_flag(alt: bool) -> Self {
        if alt {
            Homozygosity::Alternate
        } else {
            Homozygosity::Standard
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Homozygosity::Standard => "binomial coefficients",
            Homozygosity::Alternate => "sum of squared haplotype frequencies",
        }
    }

    /// Homozygosity of a subset of `total` haplotypes split into groups of `sizes`
    pub fn estimate(&self, sizes: &[usize], total: usize) -> f64 {
        match self {
            Homozygosity::Standard => sizes.iter().map(|&n| pair_fraction(n, total)).sum(),
            Homozygosity::Alternate => {
                if total == 0 {
                    return 0.0;
                }
                sizes
                    .iter()
                    .map(|&n| {
                        let f = n as f64 / total as f64;
                        f * f
                    })
                    .sum()
            }
        }
    }
}

/// Soft-sweep haplotype statistics for one grouping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftTriplet {
    pub h1: f64,
    /// h1 with the k most common groups pooled into one (h12 for k = 2)
    pub h12: f64,
    /// Not finite when h1 is zero
    pub h2_over_h1: f64,
}

impl SoftTriplet {
    /// Value at the core, where the whole set is treated as a single group
    pub fn at_core() -> Self {
        Self {
            h1: 1.0,
            h12: 1.0,
            h2_over_h1: 0.0,
        }
    }

    /// Compute from group sizes, pooling the `k` largest groups for h12
    ///
    /// Groups of equal size rank in the order they appear in `sizes`.
    pub fn from_groups(sizes: &[usize], total: usize, k: usize) -> Self {
        let mut h1 = 0.0;
        let mut top: Vec<usize> = Vec::with_capacity(k + 1);

        for &size in sizes {
            h1 += pair_fraction(size, total);
            if k == 0 {
                continue;
            }
            match top.iter().position(|&t| size > t) {
                Some(pos) => {
                    top.insert(pos, size);
                    top.truncate(k);
                }
                None if top.len() < k => top.push(size),
                None => {}
            }
        }

        let first = top.first().copied().unwrap_or(0);
        let pooled: usize = top.iter().sum();
        let separate: f64 = top.iter().map(|&t| pair_fraction(t, total)).sum();

        Self {
            h1,
            h12: h1 - separate + pair_fraction(pooled, total),
            h2_over_h1: (h1 - pair_fraction(first, total)) / h1,
        }
    }

    /// h2/h1 with the h1 = 0 case mapped to zero
    pub fn h2_over_h1_or_zero(&self) -> f64 {
        if self.h2_over_h1.is_finite() {
            self.h2_over_h1
        } else {
            0.0
        }
    }
}

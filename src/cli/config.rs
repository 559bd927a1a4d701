// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub hap: Option<String>,
    #[serde(rename = "ref")]
    pub ref_hap: Option<String>,
    pub map: Option<String>,
    pub out: Option<String>,

    // Statistic
    pub ihs: Option<bool>,
    pub xpehh: Option<bool>,
    pub soft: Option<bool>,
    pub ehh: Option<String>,
    pub ehh_soft: Option<bool>,

    // Scan parameters
    pub cutoff: Option<f64>,
    pub max_gap: Option<i64>,
    pub gap_scale: Option<i64>,
    pub maf: Option<f64>,
    pub alt: Option<bool>,
    pub ehh_win: Option<i64>,
    pub ehh1k: Option<usize>,

    // Performance
    pub threads: Option<usize>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# ehhscan.toml - Configuration file for ehhscan
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Haplotype file (population 1 for XP-EHH)
hap = "/path/to/pop1.hap"

# Reference haplotype file (population 2), XP-EHH only
# ref = "/path/to/pop2.hap"

# Map file: <chr> <locus id> <genetic pos> <physical pos>
map = "/path/to/chr1.map"

# Output basename
out = "chr1"

# =============================================================================
# STATISTIC (select exactly one)
# =============================================================================

ihs = true
# xpehh = true
# soft = true
# ehh = "rs12345"

# Report h1, h12 and h2/h1 in the --ehh curve
# ehh_soft = false

# =============================================================================
# SCAN PARAMETERS
# =============================================================================

# EHH value at which integration stops
cutoff = 0.05

# Largest physical gap (bp) a scan may cross
max_gap = 200000

# Gaps longer than this (bp) are down-weighted
gap_scale = 20000

# Minor allele frequency floor for iHS core loci
maf = 0.05

# Sum of squared haplotype frequencies instead of the binomial estimator
alt = false

# Half-width (bp) of the --ehh window
ehh_win = 100000

# Number of most common haplotypes pooled for h12
ehh1k = 2

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of worker threads
threads = 4
"#
        .to_string()
    }
}

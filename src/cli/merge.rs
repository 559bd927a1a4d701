// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.hap.is_none() {
            self.hap = config.hap;
        }
        if self.ref_hap.is_none() {
            self.ref_hap = config.ref_hap;
        }
        if self.map.is_none() {
            self.map = config.map;
        }
        if self.out == "outfile" {
            if let Some(out) = config.out {
                self.out = out;
            }
        }

        // Statistic (switches can only be turned on from the file)
        if !self.ihs && config.ihs.unwrap_or(false) {
            self.ihs = true;
        }
        if !self.xpehh && config.xpehh.unwrap_or(false) {
            self.xpehh = true;
        }
        if !self.soft && config.soft.unwrap_or(false) {
            self.soft = true;
        }
        if self.ehh.is_none() {
            self.ehh = config.ehh;
        }
        if !self.ehh_soft && config.ehh_soft.unwrap_or(false) {
            self.ehh_soft = true;
        }

        // Scan parameters (only override defaults, not explicit CLI values)
        if self.cutoff == 0.05 {
            if let Some(cutoff) = config.cutoff {
                self.cutoff = cutoff;
            }
        }
        if self.max_gap == 200_000 {
            if let Some(max_gap) = config.max_gap {
                self.max_gap = max_gap;
            }
        }
        if self.gap_scale == 20_000 {
            if let Some(gap_scale) = config.gap_scale {
                self.gap_scale = gap_scale;
            }
        }
        if self.maf == 0.05 {
            if let Some(maf) = config.maf {
                self.maf = maf;
            }
        }
        if !self.alt && config.alt.unwrap_or(false) {
            self.alt = true;
        }
        if self.ehh_win == 100_000 {
            if let Some(ehh_win) = config.ehh_win {
                self.ehh_win = ehh_win;
            }
        }
        if self.ehh1k == 2 {
            if let Some(ehh1k) = config.ehh1k {
                self.ehh1k = ehh1k;
            }
        }

        // Performance
        if self.threads == 1 {
            if let Some(threads) = config.threads {
                self.threads = threads;
            }
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

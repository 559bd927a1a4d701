// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// ehhscan - Multithreaded EHH-based scans for positive selection
pub struct Args {
    /// haplotype file (population 1 for XP-EHH); one row per haplotype, 0/1 per locus
    #[argh(option)]
    pub hap: Option<String>,

    /// reference haplotype file (population 2), XP-EHH only
    #[argh(option, long = "ref")]
    pub ref_hap: Option<String>,

    /// map file: <chr> <locus id> <genetic pos> <physical pos> per locus
    #[argh(option)]
    pub map: Option<String>,

    /// output basename (default: outfile)
    #[argh(option, default = "String::from(\"outfile\")")]
    pub out: String,

    /// number of worker threads (default: 1)
    #[argh(option, default = "1")]
    pub threads: usize,

    /// EHH value at which integration stops (default: 0.05)
    #[argh(option, default = "0.05")]
    pub cutoff: f64,

    /// largest physical gap in bp a scan may cross (default: 200000)
    #[argh(option, default = "200000")]
    pub max_gap: i64,

    /// gaps longer than this many bp are down-weighted (default: 20000)
    #[argh(option, default = "20000")]
    pub gap_scale: i64,

    /// minor allele frequency floor for iHS core loci (default: 0.05)
    #[argh(option, default = "0.05")]
    pub maf: f64,

    /// use the sum of squared haplotype frequencies as the homozygosity estimator
    #[argh(switch)]
    pub alt: bool,

    /// compute iHS for every locus
    #[argh(switch)]
    pub ihs: bool,

    /// compute XP-EHH for every locus (requires --ref)
    #[argh(switch)]
    pub xpehh: bool,

    /// compute integrated h1, h12 and h2/h1 for every locus
    #[argh(switch)]
    pub soft: bool,

    /// report the EHH decay curve around this locus id
    #[argh(option)]
    pub ehh: Option<String>,

    /// half-width in bp of the --ehh window (default: 100000)
    #[argh(option, default = "100000")]
    pub ehh_win: i64,

    /// with --ehh, report h1, h12 and h2/h1 instead of derived/ancestral EHH
    #[argh(switch)]
    pub ehh_soft: bool,

    /// number of most common haplotypes pooled for h12 (default: 2)
    #[argh(option, default = "2")]
    pub ehh1k: usize,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}

impl Args {
    /// Parse from an explicit argument list
    pub fn parse_from(args: &[&str]) -> Result<Self, String> {
        Args::from_args(&["ehhscan"], args).map_err(|exit| exit.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(&["--ihs", "--hap", "a.hap", "--map", "a.map"]).unwrap();
        assert!(args.ihs);
        assert_eq!(args.out, "outfile");
        assert_eq!(args.threads, 1);
        assert_eq!(args.cutoff, 0.05);
        assert_eq!(args.max_gap, 200_000);
        assert_eq!(args.gap_scale, 20_000);
        assert_eq!(args.ehh_win, 100_000);
        assert_eq!(args.ehh1k, 2);
        assert!(args.ref_hap.is_none());
    }

    #[test]
    fn test_ref_option_name() {
        let args = Args::parse_from(&["--xpehh", "--ref", "p2.hap"]).unwrap();
        assert_eq!(args.ref_hap.as_deref(), Some("p2.hap"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::parse_from(&["--bogus"]).is_err());
    }
}

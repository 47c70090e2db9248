use std::path::{Path, PathBuf};

use sync_core::{config::FreqConfig, filter::RegionMap};

/// What to do with a SYNC row that can not be parsed or summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Stop processing the input file with an error
    #[default]
    Abort,
    /// Log the row and continue with the next one
    Skip,
}

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// input - SYNC input file
/// output_dir - directory for the frequency table and VCF
/// prefix - prefix for output file names (<prefix>_frequencies.csv, <prefix>.vcf)
/// freq_cfg - populations, depth and summary options
/// regions - regions used to restrict the sites processed
/// with_counts - add per population A/T/C/G counts to the frequency table
/// policy - handling of malformed rows
///
pub struct Config {
    input: PathBuf,
    output_dir: PathBuf,
    prefix: String,
    freq_cfg: FreqConfig,
    regions: RegionMap,
    with_counts: bool,
    policy: MalformedPolicy,
}

impl Config {
    pub fn new(input: PathBuf, output_dir: PathBuf, prefix: String, freq_cfg: FreqConfig) -> Self {
        Self {
            input,
            output_dir,
            prefix,
            freq_cfg,
            regions: RegionMap::default(),
            with_counts: false,
            policy: MalformedPolicy::default(),
        }
    }

    pub fn set_regions(&mut self, regions: RegionMap) {
        self.regions = regions
    }

    pub fn set_with_counts(&mut self, x: bool) {
        self.with_counts = x
    }

    pub fn set_policy(&mut self, policy: MalformedPolicy) {
        self.policy = policy
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn freq_cfg(&self) -> &FreqConfig {
        &self.freq_cfg
    }

    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    pub fn with_counts(&self) -> bool {
        self.with_counts
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    pub fn freq_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_frequencies.csv", self.prefix))
    }

    pub fn vcf_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.vcf", self.prefix))
    }
}

use std::path::{Path, PathBuf};

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// input - tab separated file with chromosome and point columns
/// output_dir - directory for the per chromosome region files
/// window - sliding window size used when merging points
///
pub struct Config {
    input: PathBuf,
    output_dir: PathBuf,
    window: u64,
}

impl Config {
    pub fn new(input: PathBuf, output_dir: PathBuf, window: u64) -> Self {
        Self {
            input,
            output_dir,
            window,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn window(&self) -> u64 {
        self.window
    }
}

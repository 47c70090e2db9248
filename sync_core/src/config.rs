use std::collections::HashSet;

use crate::{Result, SyncError};

/// Settings for frequency summarization
///
/// populations - population identifiers, in the order of the SYNC count columns
/// depth - pooled depth per population per site (denominator for frequencies)
/// non_ref_only - drop sites where the consensus ALT equals REF
/// genotype - call a genotype for each population
/// diff - indices (into populations) of the pair used for the difference column
///
/// Created once through FreqConfig::new(), which validates the settings, and
/// then read only
#[derive(Debug, Clone)]
pub struct FreqConfig {
    populations: Vec<String>,
    depth: u32,
    non_ref_only: bool,
    genotype: bool,
    diff: Option<(usize, usize)>,
}

impl FreqConfig {
    pub fn new<S: AsRef<str>>(
        populations: &[S],
        depth: u32,
        non_ref_only: bool,
        genotype: bool,
        diff: Option<(&str, &str)>,
    ) -> Result<Self> {
        if depth == 0 {
            return Err(SyncError::config("Pooled depth must be greater than 0"));
        }
        if populations.is_empty() {
            return Err(SyncError::config("No populations specified"));
        }
        let populations: Vec<String> = populations
            .iter()
            .map(|s| s.as_ref().trim().to_owned())
            .collect();
        let mut seen = HashSet::new();
        for p in populations.iter() {
            if p.is_empty() {
                return Err(SyncError::config("Empty population name"));
            }
            if !seen.insert(p.as_str()) {
                return Err(SyncError::config(format!("Duplicate population {}", p)));
            }
        }
        let find = |name: &str| {
            populations
                .iter()
                .position(|p| p == name)
                .ok_or_else(|| {
                    SyncError::config(format!(
                        "Population {} for difference column not found in population list",
                        name
                    ))
                })
        };
        let diff = match diff {
            Some((a, b)) => Some((find(a.trim())?, find(b.trim())?)),
            None => None,
        };
        debug!(
            "Frequency config: populations {:?}, depth {}, non_ref_only {}, genotype {}, diff {:?}",
            populations, depth, non_ref_only, genotype, diff
        );
        Ok(Self {
            populations,
            depth,
            non_ref_only,
            genotype,
            diff,
        })
    }

    pub fn populations(&self) -> &[String] {
        &self.populations
    }

    pub fn n_pops(&self) -> usize {
        self.populations.len()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn non_ref_only(&self) -> bool {
        self.non_ref_only
    }

    pub fn genotype(&self) -> bool {
        self.genotype
    }

    pub fn diff(&self) -> Option<(usize, usize)> {
        self.diff
    }

    /// Name of the difference column, i.e. pop1_pop3_diff
    pub fn diff_name(&self) -> Option<String> {
        self.diff.map(|(a, b)| {
            format!("{}_{}_diff", self.populations[a], self.populations[b])
        })
    }
}

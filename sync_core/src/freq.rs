use std::fmt;

use crate::{
    allele::{Allele, AlleleCounts},
    config::FreqConfig,
    site::SiteRecord,
    Result, SyncError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genotype {
    HomRef,
    Het,
    HomAlt,
}

impl Genotype {
    pub fn from_ref_count(ref_count: u32, depth: u32) -> Self {
        if ref_count == depth {
            Self::HomRef
        } else if ref_count == 0 {
            Self::HomAlt
        } else {
            Self::Het
        }
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HomRef => "0/0",
            Self::Het => "0/1",
            Self::HomAlt => "1/1",
        })
    }
}

/// Per population results for a site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopFreq {
    freq: f64,
    genotype: Option<Genotype>,
}

impl PopFreq {
    pub fn freq(&self) -> f64 {
        self.freq
    }
    pub fn genotype(&self) -> Option<Genotype> {
        self.genotype
    }
}

/// Summary for a retained site
///
/// pops is aligned with FreqConfig::populations()
#[derive(Debug, Clone)]
pub struct FrequencyRecord {
    site: SiteRecord,
    alt: Allele,
    pops: Vec<PopFreq>,
    diff: Option<f64>,
}

impl FrequencyRecord {
    pub fn site(&self) -> &SiteRecord {
        &self.site
    }
    pub fn alt(&self) -> Allele {
        self.alt
    }
    pub fn pops(&self) -> &[PopFreq] {
        &self.pops
    }
    pub fn diff(&self) -> Option<f64> {
        self.diff
    }
}

/// Round to 3 decimal places
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Consensus alternate allele
///
/// The A/T/C/G counts are summed over all populations (N and deletions are
/// ignored) and the allele with the highest total is returned.  Ties go to
/// the allele appearing first in Allele::ALL (A, T, C, G).
pub fn consensus_alt(counts: &[AlleleCounts]) -> Allele {
    let mut totals = [0u64; 4];
    for c in counts {
        for a in Allele::ALL {
            totals[a.idx()] += c.get(a) as u64
        }
    }
    let mut best = Allele::A;
    for a in &Allele::ALL[1..] {
        // Strictly greater, so an earlier allele keeps a tie
        if totals[a.idx()] > totals[best.idx()] {
            best = *a
        }
    }
    best
}

/// Allele frequency of the alternate allele as (depth - ref_count) / depth,
/// rounded to 3 decimal places
///
/// Rounding is done on the exact ratio with ties going to the even digit, so
/// 1/16 gives 0.062 and 3/16 gives 0.188
pub fn alt_freq(ref_count: u32, depth: u32) -> Result<f64> {
    if depth == 0 {
        Err(SyncError::config("Pooled depth must be greater than 0"))
    } else if ref_count > depth {
        Err(SyncError::parse(format!(
            "Reference count {} exceeds pooled depth {}",
            ref_count, depth
        )))
    } else {
        let (num, den) = ((depth - ref_count) as u64 * 1000, depth as u64);
        let (mut q, r) = (num / den, num % den);
        if 2 * r > den || (2 * r == den && q & 1 == 1) {
            q += 1
        }
        Ok(q as f64 / 1000.0)
    }
}

/// Summarize one site
///
/// Returns Ok(None) if the site is dropped by the non-reference filter.
/// A reference allele outside A/T/C/G can never match the consensus ALT, so
/// such sites are always kept; their reference count comes from the N field
/// (for N) or is 0 (anything else).
pub fn summarize(site: &SiteRecord, cfg: &FreqConfig) -> Result<Option<FrequencyRecord>> {
    let counts = site.counts();
    if counts.len() != cfg.n_pops() {
        return Err(SyncError::parse(format!(
            "Site has counts for {} populations, expected {}",
            counts.len(),
            cfg.n_pops()
        )));
    }
    let alt = consensus_alt(counts);
    if cfg.non_ref_only() && site.ref_allele().allele() == Some(alt) {
        return Ok(None);
    }
    let depth = cfg.depth();
    let pops = counts
        .iter()
        .map(|c| {
            let ref_count = c.ref_count(site.ref_allele());
            let freq = alt_freq(ref_count, depth)?;
            let genotype = if cfg.genotype() {
                Some(Genotype::from_ref_count(ref_count, depth))
            } else {
                None
            };
            Ok(PopFreq {
                freq,
                genotype,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let diff = cfg
        .diff()
        .map(|(a, b)| (pops[a].freq - pops[b].freq).abs());
    Ok(Some(FrequencyRecord {
        site: site.clone(),
        alt,
        pops,
        diff,
    }))
}

/// Counts of unusual (but accepted) input seen while summarizing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStats {
    pub sites: usize,
    pub retained: usize,
    pub non_acgt_ref: usize,
    pub depth_mismatch: usize,
}

/// Wraps summarize() and keeps track of SummaryStats
pub struct Summarizer<'a> {
    cfg: &'a FreqConfig,
    stats: SummaryStats,
}

impl<'a> Summarizer<'a> {
    pub fn new(cfg: &'a FreqConfig) -> Self {
        Self {
            cfg,
            stats: SummaryStats::default(),
        }
    }

    pub fn summarize(&mut self, site: &SiteRecord) -> Result<Option<FrequencyRecord>> {
        let res = summarize(site, self.cfg)?;
        self.stats.sites += 1;
        if !site.ref_allele().is_base() {
            trace!(
                "Non A/T/C/G reference {} at {}:{}",
                site.ref_allele(),
                site.ctg(),
                site.pos()
            );
            self.stats.non_acgt_ref += 1;
        }
        let depth = self.cfg.depth() as u64;
        self.stats.depth_mismatch += site
            .counts()
            .iter()
            .filter(|c| c.total() != depth)
            .count();
        if res.is_some() {
            self.stats.retained += 1
        }
        Ok(res)
    }

    pub fn stats(&self) -> SummaryStats {
        self.stats
    }
}

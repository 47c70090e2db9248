use std::collections::{HashMap, HashSet};

use crate::{region::Region, site::SiteRecord, Contig};

/// Restricts sites to a sorted, non-overlapping list of regions
///
/// An empty (or absent) region list means no restriction, so every site passes
#[derive(Debug, Clone, Copy)]
pub struct RegionFilter<'a> {
    regions: &'a [Region],
}

impl<'a> RegionFilter<'a> {
    pub fn new(regions: Option<&'a [Region]>) -> Self {
        Self {
            regions: regions.unwrap_or(&[]),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty()
    }

    /// Check whether x lies in [start, end] for some region
    pub fn contains(&self, x: u64) -> bool {
        if self.regions.is_empty() {
            return true;
        }
        // Index of first region with start > x; the candidate is the one before it
        let i = self.regions.partition_point(|r| r.start() <= x);
        i > 0 && x <= self.regions[i - 1].end()
    }

    pub fn pass(&self, site: &SiteRecord) -> bool {
        self.contains(site.pos())
    }

    /// Keep the records lying within the regions, preserving input order
    pub fn filter(&self, records: Vec<SiteRecord>) -> Vec<SiteRecord> {
        if self.is_unrestricted() {
            records
        } else {
            records.into_iter().filter(|s| self.pass(s)).collect()
        }
    }
}

/// Where the regions for a chromosome come from
#[derive(Debug, Default)]
pub enum RegionMap {
    /// No regions supplied; all sites are processed
    #[default]
    Unrestricted,
    /// One list of regions applied to every chromosome
    Global(Vec<Region>),
    /// Separate region lists per chromosome
    PerContig(HashMap<Contig, Vec<Region>>),
}

impl RegionMap {
    /// Regions for ctg.  None means the chromosome is not restricted
    pub fn regions(&self, ctg: &str) -> Option<&[Region]> {
        match self {
            Self::Unrestricted => None,
            Self::Global(v) => Some(v.as_slice()),
            Self::PerContig(h) => h.get(ctg).map(|v| v.as_slice()),
        }
    }

    pub fn filter(&self, ctg: &str) -> RegionFilter<'_> {
        RegionFilter::new(self.regions(ctg))
    }
}

/// Hands out filters by chromosome, warning once for each chromosome
/// that has no regions in a per-chromosome map
pub struct ContigFilters<'a> {
    map: &'a RegionMap,
    warned: HashSet<Contig>,
}

impl<'a> ContigFilters<'a> {
    pub fn new(map: &'a RegionMap) -> Self {
        Self {
            map,
            warned: HashSet::new(),
        }
    }

    pub fn get(&mut self, ctg: &Contig) -> RegionFilter<'a> {
        let f = self.map.filter(ctg);
        if f.is_unrestricted()
            && matches!(self.map, RegionMap::PerContig(_))
            && !self.warned.contains(ctg)
        {
            warn!(
                "No regions found for {}; all sites on this chromosome will be processed",
                ctg
            );
            self.warned.insert(ctg.clone());
        }
        f
    }

    /// Chromosomes that fell back to being unrestricted
    pub fn missing(&self) -> usize {
        self.warned.len()
    }
}

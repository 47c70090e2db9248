use std::fmt;

use crate::{Result, SyncError};

/// Closed genomic interval [start, end] on a single chromosome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Region {
    start: u64,
    end: u64,
}

impl Region {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if end >= start {
            Ok(Self { start, end })
        } else {
            Err(SyncError::parse(format!(
                "Region error - {} > {}",
                start, end
            )))
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn contains(&self, x: u64) -> bool {
        x >= self.start && x <= self.end
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

/// Merge candidate positions into windowed regions
///
/// Each point p opens the interval [p, p + window].  Points are visited in
/// sorted order, and a point p joins the current region if p <= end + window,
/// where end is the current (possibly already extended) end of the region.  In
/// that case the end becomes max(end, p + window); the start never moves.
/// Otherwise the current region is closed and a new one started at p.
///
/// Because the test uses the extended end, a chain of close points is merged
/// into one region even if the first and last points are far apart.  This is
/// not the same as merging the overlapping intervals [p, p + window].
pub fn merge_points(mut points: Vec<u64>, window: u64) -> Result<Vec<Region>> {
    if window == 0 {
        return Err(SyncError::config("Window size must be greater than 0"));
    }
    points.sort_unstable();
    let mut it = points.into_iter();
    let mut regions = Vec::new();
    if let Some(p) = it.next() {
        // Accumulator (start, current end)
        let mut curr = (p, p.saturating_add(window));
        for p in it {
            if p <= curr.1.saturating_add(window) {
                curr.1 = curr.1.max(p.saturating_add(window))
            } else {
                regions.push(Region {
                    start: curr.0,
                    end: curr.1,
                });
                curr = (p, p.saturating_add(window))
            }
        }
        regions.push(Region {
            start: curr.0,
            end: curr.1,
        });
    }
    Ok(regions)
}

/// Form a sorted, non-overlapping vector from an arbitrary list of regions
///
/// Used for region lists read from files, which may not have come from
/// merge_points().  Overlapping or touching regions are joined.
pub fn sort_and_merge(mut v: Vec<Region>) -> Vec<Region> {
    if v.len() < 2 {
        return v;
    }
    v.sort_unstable_by_key(|r| r.start);
    let mut v1 = Vec::with_capacity(v.len());
    let mut prev = v[0];
    for r in &v[1..] {
        // Check for overlap
        if r.start <= prev.end {
            prev.end = prev.end.max(r.end)
        } else {
            v1.push(prev);
            prev = *r
        }
    }
    v1.push(prev);
    v1
}

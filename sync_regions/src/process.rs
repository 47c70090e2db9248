use std::fs;

use anyhow::Context;
use sync_core::region::merge_points;

use crate::{config::Config, io};

/// Strategy
///
/// Read in all points, grouped by chromosome (merging needs the complete set
/// of points for a chromosome as a later point can extend the current region).
/// Then merge the points for each chromosome and write out one region file
/// per chromosome
pub fn process_points(cfg: &Config) -> anyhow::Result<()> {
    debug!("Starting processing");

    let points = io::read_point_file(cfg.input())
        .with_context(|| "Could not read from point file")?;

    if points.is_empty() {
        warn!("No points found in {}", cfg.input().display());
    }
    for ctg in points.keys() {
        io::check_contig_name(ctg)
            .with_context(|| format!("Bad chromosome name in {}", cfg.input().display()))?;
    }

    // Only create the output directory once the input has been read and checked
    let d = cfg.output_dir();
    if !d.exists() {
        fs::create_dir_all(d)
            .with_context(|| format!("Error creating output directory {}", d.display()))?;
    }

    for (ctg, v) in points {
        let n = v.len();
        let regions = merge_points(v, cfg.window())?;
        debug!("{}: {} points merged into {} regions", ctg, n, regions.len());
        io::write_region_file(d, &ctg, &regions)?;
    }

    info!("Region files written to {}", d.display());
    Ok(())
}

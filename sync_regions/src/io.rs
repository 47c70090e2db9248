use std::{
    collections::BTreeMap,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;
use sync_core::{output, region::Region};
use utils::get_next_line;

/// Find the chromosome and point columns from the first line of the point file
///
/// Returns the column indices and whether the first line is a header.  If the
/// second field parses as an integer there is no header, and the first two
/// columns are used.
fn find_columns(fields: &[&str]) -> anyhow::Result<(usize, usize, bool)> {
    if fields.len() >= 2 && fields[1].parse::<u64>().is_ok() {
        trace!("No header found; using columns 1 and 2");
        return Ok((0, 1, false));
    }
    let col = |name: &str| {
        fields
            .iter()
            .position(|s| s.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Missing {} column in header", name))
    };
    Ok((col("chromosome")?, col("point")?, true))
}

/// Read in points from a tab separated file, grouping by chromosome
///
/// The file should have a header line with (at least) chromosome and point
/// columns.  Other columns are ignored.
pub fn read_points<R: BufRead>(
    mut rdr: R,
    fname: &Path,
) -> anyhow::Result<BTreeMap<String, Vec<u64>>> {
    let mut buf = String::new();
    let mut line = 0;
    let mut cols = None;
    let mut points: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    let mut n = 0;

    while let Some(fields) = get_next_line(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, fname.display()))?
    {
        line += 1;
        // Skip blank lines
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        let (ctg_ix, pt_ix) = match cols {
            Some(c) => c,
            None => {
                let (c, p, header) = find_columns(&fields)
                    .with_context(|| format!("{}:{} Error reading header", fname.display(), line))?;
                cols = Some((c, p));
                if header {
                    continue;
                }
                (c, p)
            }
        };
        let (ctg, x) = match (fields.get(ctg_ix), fields.get(pt_ix)) {
            (Some(c), Some(x)) => (c, x),
            _ => {
                return Err(anyhow!(
                    "{}:{} Short line ({} fields)",
                    fname.display(),
                    line,
                    fields.len()
                ))
            }
        };
        let x = x
            .parse::<u64>()
            .with_context(|| format!("{}:{} Error reading point {}", fname.display(), line, x))?;
        if let Some(v) = points.get_mut(*ctg) {
            v.push(x)
        } else {
            trace!("Adding contig {}", ctg);
            points.insert((*ctg).to_owned(), vec![x]);
        }
        n += 1;
    }
    debug!(
        "Finished reading in {} lines; found {} points on {} contigs",
        line,
        n,
        points.len()
    );
    Ok(points)
}

pub fn read_point_file(fname: &Path) -> anyhow::Result<BTreeMap<String, Vec<u64>>> {
    debug!("Reading in points from {}", fname.display());
    let rdr = CompressIo::new()
        .path(fname)
        .bufreader()
        .with_context(|| format!("Error opening point file {}", fname.display()))?;
    read_points(rdr, fname)
}

/// Chromosome names become part of the region file names, so they must not
/// contain path separators or be a relative directory name
pub fn check_contig_name(ctg: &str) -> anyhow::Result<()> {
    if ctg.is_empty() || ctg == "." || ctg == ".." || ctg.contains(['/', '\\']) {
        Err(anyhow!(
            "Chromosome name {:?} cannot be used in a file name",
            ctg
        ))
    } else {
        Ok(())
    }
}

pub fn region_file_path(dir: &Path, ctg: &str) -> anyhow::Result<PathBuf> {
    check_contig_name(ctg)?;
    Ok(dir.join(format!("{}_regions.csv", ctg)))
}

pub fn write_regions<W: Write>(mut wrt: W, regions: &[Region]) -> std::io::Result<()> {
    writeln!(wrt, "{}", output::REGION_HEADER)?;
    for r in regions {
        writeln!(wrt, "{}", output::region_row(r))?
    }
    wrt.flush()
}

pub fn write_region_file(dir: &Path, ctg: &str, regions: &[Region]) -> anyhow::Result<()> {
    let opath = region_file_path(dir, ctg)?;
    trace!("Writing {} regions to {}", regions.len(), opath.display());
    let wrt = CompressIo::new()
        .path(&opath)
        .bufwriter()
        .with_context(|| format!("problem creating output file {}", opath.display()))?;
    write_regions(wrt, regions)
        .with_context(|| format!("Error writing regions to {}", opath.display()))
}

use std::{
    collections::HashMap,
    fs,
    io::{BufRead, Write},
    path::Path,
    sync::Arc,
};

use anyhow::Context;
use compress_io::compress::CompressIo;
use regex::Regex;
use sync_core::{
    region::{sort_and_merge, Region},
    Contig,
};
use utils::get_next_line_delim;

/// Read regions (start, end) from a comma or tab separated table
///
/// A header line (start,end) is skipped if present.  The regions are returned
/// sorted and with any overlaps merged
pub fn read_regions<R: BufRead>(mut rdr: R, fname: &Path) -> anyhow::Result<Vec<Region>> {
    let mut buf = String::new();
    let mut line = 0;
    let mut v = Vec::new();
    let mut first = true;

    while let Some(fields) = get_next_line_delim(&mut rdr, &mut buf, &[',', '\t'])
        .with_context(|| format!("Error after reading {} lines from {}", line, fname.display()))?
    {
        line += 1;
        // Skip blank lines
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        // Only the first non-blank line can be a header
        if std::mem::take(&mut first) && fields[0].parse::<u64>().is_err() {
            trace!("Skipping header line {:?}", fields);
            continue;
        }
        if fields.len() < 2 {
            return Err(anyhow!("{}:{} Short line", fname.display(), line));
        }
        let coord = |i: usize| {
            fields[i]
                .parse::<u64>()
                .with_context(|| format!("{}:{} Error reading coordinate", fname.display(), line))
        };
        let (a, b) = (coord(0)?, coord(1)?);
        v.push(Region::new(a, b).with_context(|| format!("{}:{}", fname.display(), line))?)
    }
    let n = v.len();
    let v = sort_and_merge(v);
    debug!(
        "Read {} regions from {} ({} after merging)",
        n,
        fname.display(),
        v.len()
    );
    Ok(v)
}

pub fn read_region_file(fname: &Path) -> anyhow::Result<Vec<Region>> {
    trace!("Opening region file {} for reading", fname.display());
    let rdr = CompressIo::new()
        .path(fname)
        .bufreader()
        .with_context(|| format!("Error opening region file {}", fname.display()))?;
    read_regions(rdr, fname)
}

/// Collect region files from a directory.
/// Each file name is parsed to extract the contig name (<contig>_regions.csv)
/// and the regions for that contig are read in
pub fn read_region_dir(dir: &Path) -> anyhow::Result<HashMap<Contig, Vec<Region>>> {
    let reg = Regex::new(r"^(.+)_regions[.]csv$")?;
    let mut h = HashMap::new();

    for f in dir
        .read_dir()
        .with_context(|| format!("Error checking regions directory {}", dir.display()))?
    {
        let entry =
            f.with_context(|| format!("Could not get directory entry from {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            let name = match entry.file_name().into_string() {
                Ok(s) => s,
                Err(_) => {
                    warn!("Skipping file with illegal name in {}", dir.display());
                    continue;
                }
            };
            if let Some(c) = reg.captures(name.as_str()) {
                let ctg: Contig = Arc::from(&c[1]);
                trace!("Reading regions for {} from {}", ctg, path.display());
                let v = read_region_file(&path)?;
                h.insert(ctg, v);
            }
        }
    }

    if h.is_empty() {
        warn!(
            "No region files found in {}; all sites will be processed",
            dir.display()
        )
    } else {
        debug!("Region files found for {} contigs in {}", h.len(), dir.display());
    }
    Ok(h)
}

/// Open an output file, reporting the path on failure
pub fn open_output(p: &Path) -> anyhow::Result<impl Write> {
    trace!("Opening output file {}", p.display());
    CompressIo::new()
        .path(p)
        .bufwriter()
        .with_context(|| format!("problem creating output file {}", p.display()))
}

pub fn make_output_dir(d: &Path) -> anyhow::Result<()> {
    if !d.exists() {
        fs::create_dir_all(d)
            .with_context(|| format!("Error creating output directory {}", d.display()))?;
        debug!("Created output directory {}", d.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reg(a: u64, b: u64) -> Region {
        Region::new(a, b).unwrap()
    }

    #[test]
    fn region_table() {
        let s = "start,end\n300,310\n100,115\n\n105,120\n";
        let v = read_regions(Cursor::new(s), Path::new("test")).unwrap();
        assert_eq!(v, vec![reg(100, 120), reg(300, 310)]);

        // No header, tab separated
        let s = "977000\t985000\n1067000\t1071000\n";
        let v = read_regions(Cursor::new(s), Path::new("test")).unwrap();
        assert_eq!(v, vec![reg(977000, 985000), reg(1067000, 1071000)]);

        // Leading blank line before the header
        let s = "\nstart,end\n100,115\n";
        let v = read_regions(Cursor::new(s), Path::new("test")).unwrap();
        assert_eq!(v, vec![reg(100, 115)]);
    }

    #[test]
    fn bad_region_table() {
        for s in [
            "start,end\n10,x\n",
            "start,end\n10\n",
            "start,end\n20,10\n",
            "10,20\nstart,end\n",
        ] {
            assert!(read_regions(Cursor::new(s), Path::new("test")).is_err());
        }
    }

    #[test]
    fn region_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("chr2_regions.csv"), "start,end\n100,115\n").unwrap();
        fs::write(dir.path().join("chr2L_regions.csv"), "start,end\n5,6\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing here\n").unwrap();
        let h = read_region_dir(dir.path()).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h["chr2"], vec![reg(100, 115)]);
        assert_eq!(h["chr2L"], vec![reg(5, 6)]);
    }
}

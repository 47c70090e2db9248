use std::{io::Write, thread};

use anyhow::Context;
use crossbeam_channel::{bounded, Receiver};
use sync_core::{
    filter::{ContigFilters, RegionFilter},
    freq::{Summarizer, SummaryStats},
    output::TableFormat,
    Contig,
};

use crate::{
    config::{Config, MalformedPolicy},
    io,
    reader::{self, Batch},
};

/// Number of batches that can be queued between the reader and processing threads
const QUEUE_LEN: usize = 8;

#[derive(Debug, Default)]
pub struct RunStats {
    pub summary: SummaryStats,
    pub out_of_region: usize,
    pub skipped: usize,
}

/// Filter, summarize and write out all rows received on rcv
///
/// A row that fails to parse, or fails to summarize, is either skipped with
/// a warning or ends processing, depending on the configured policy
pub fn process_batches<W1: Write, W2: Write>(
    cfg: &Config,
    rcv: Receiver<Batch>,
    freq_wrt: &mut W1,
    vcf_wrt: &mut W2,
) -> anyhow::Result<RunStats> {
    let fcfg = cfg.freq_cfg();
    let tf = TableFormat::new(fcfg, cfg.with_counts());
    let mut summarizer = Summarizer::new(fcfg);
    let mut filters = ContigFilters::new(cfg.regions());
    let mut current: Option<(Contig, RegionFilter)> = None;
    let mut stats = RunStats::default();

    writeln!(freq_wrt, "{}", tf.freq_header())?;
    writeln!(vcf_wrt, "{}", tf.vcf_header())?;

    let handle_error = |e: anyhow::Error, stats: &mut RunStats| -> anyhow::Result<()> {
        match cfg.policy() {
            MalformedPolicy::Abort => Err(e),
            MalformedPolicy::Skip => {
                warn!("Skipping row: {:#}", e);
                stats.skipped += 1;
                Ok(())
            }
        }
    };

    for batch in rcv.iter() {
        for row in batch {
            let site = match row.site {
                Ok(s) => s,
                Err(e) => {
                    handle_error(e, &mut stats)?;
                    continue;
                }
            };

            // Get region filter for this chromosome, only looking it up when the chromosome changes
            let f = match &current {
                Some((c, f)) if c == site.ctg() => *f,
                _ => {
                    debug!("Processing {}", site.ctg());
                    let f = filters.get(site.ctg());
                    current = Some((site.ctg().clone(), f));
                    f
                }
            };
            if !f.pass(&site) {
                stats.out_of_region += 1;
                continue;
            }

            match summarizer.summarize(&site) {
                Ok(Some(rec)) => {
                    writeln!(freq_wrt, "{}", tf.freq_row(&rec))?;
                    writeln!(vcf_wrt, "{}", tf.vcf_row(&rec))?;
                }
                Ok(None) => (),
                Err(e) => {
                    let e = anyhow::Error::from(e).context(format!(
                        "{}:{} Error processing SYNC row ({}:{})",
                        cfg.input().display(),
                        row.line,
                        site.ctg(),
                        site.pos()
                    ));
                    handle_error(e, &mut stats)?
                }
            }
        }
    }
    if filters.missing() > 0 {
        debug!("{} chromosomes had no region file", filters.missing())
    }
    freq_wrt.flush()?;
    vcf_wrt.flush()?;
    stats.summary = summarizer.stats();
    Ok(stats)
}

fn report(cfg: &Config, stats: &RunStats) {
    let s = &stats.summary;
    info!(
        "{}: {} sites in regions, {} outside regions, {} written",
        cfg.input().display(),
        s.sites,
        stats.out_of_region,
        s.retained
    );
    if stats.skipped > 0 {
        warn!("{} malformed rows skipped", stats.skipped)
    }
    if s.non_acgt_ref > 0 {
        warn!(
            "{} sites had a reference allele other than A, C, G or T",
            s.non_acgt_ref
        )
    }
    if s.depth_mismatch > 0 {
        warn!(
            "{} population counts did not sum to the pooled depth {}",
            s.depth_mismatch,
            cfg.freq_cfg().depth()
        )
    }
}

/// Strategy
///
/// A reader thread parses the SYNC file and passes batches of rows to the main
/// thread, which filters by region, summarizes and writes the frequency table
/// and VCF.  Both outputs are written in input order
pub fn process_sync(cfg: &Config) -> anyhow::Result<()> {
    debug!("Starting processing");
    io::make_output_dir(cfg.output_dir())?;
    let mut freq_wrt = io::open_output(&cfg.freq_path())?;
    let mut vcf_wrt = io::open_output(&cfg.vcf_path())?;

    let res = thread::scope(|sc| {
        let (snd, rcv) = bounded(QUEUE_LEN);
        let n_pops = cfg.freq_cfg().n_pops();
        let jh = sc.spawn(move || reader::read_sync_file(cfg.input(), n_pops, snd));

        let res = process_batches(cfg, rcv, &mut freq_wrt, &mut vcf_wrt);
        let rd = jh
            .join()
            .map_err(|_| anyhow!("Error joining SYNC reader thread"))?;
        // An error from processing takes precedence (it will have caused the reader to stop)
        let stats = res?;
        let nrows = rd.with_context(|| "Error returned from SYNC reader thread")?;
        Ok::<_, anyhow::Error>((stats, nrows))
    });
    let (stats, nrows) = res.map_err(|e| {
        warn!(
            "Processing stopped; partial output left in {} and {}",
            cfg.freq_path().display(),
            cfg.vcf_path().display()
        );
        e
    })?;

    debug!("{} rows read from {}", nrows, cfg.input().display());
    report(cfg, &stats);
    debug!(
        "Output written to {} and {}",
        cfg.freq_path().display(),
        cfg.vcf_path().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_sync;
    use crossbeam_channel::unbounded;
    use std::{
        collections::HashMap,
        io::Cursor,
        path::{Path, PathBuf},
        sync::Arc,
    };
    use sync_core::{config::FreqConfig, filter::RegionMap, region::Region};

    const SYNC: &str = "\
chr2\t84\tA\t30:0:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0
chr2\t977029\tG\t30:0:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0
chr2\t977031\tA\t29:1:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0
chr2\t977052\tT\t0:0:30:0:0:0\t0:2:28:0:0:0\t0:0:30:0:0:0
chr3\t10\tC\t30:0:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0
";

    fn config(
        regions: RegionMap,
        diff: Option<(&str, &str)>,
        policy: MalformedPolicy,
    ) -> Config {
        let fcfg = FreqConfig::new(&["pop1", "pop2", "pop3"], 30, true, false, diff).unwrap();
        let mut cfg = Config::new(
            PathBuf::from("test.sync"),
            PathBuf::from("."),
            "test".to_owned(),
            fcfg,
        );
        cfg.set_regions(regions);
        cfg.set_policy(policy);
        cfg
    }

    fn run(cfg: &Config, input: &str) -> anyhow::Result<(String, String, RunStats)> {
        let (snd, rcv) = unbounded();
        read_sync(Cursor::new(input.to_owned()), Path::new("test.sync"), 3, snd)?;
        let (mut f, mut v) = (Vec::new(), Vec::new());
        let stats = process_batches(cfg, rcv, &mut f, &mut v)?;
        Ok((String::from_utf8(f)?, String::from_utf8(v)?, stats))
    }

    #[test]
    fn whole_file() {
        let cfg = config(RegionMap::Unrestricted, Some(("pop1", "pop3")), MalformedPolicy::Abort);
        let (f, v, stats) = run(&cfg, SYNC).unwrap();
        assert_eq!(
            f,
            "chromosome,position,ref,alt,POP1,POP2,POP3,pop1_pop3_diff
chr2,977029,G,A,1.0,1.0,1.0,0.0
chr2,977052,T,C,1.0,0.933,1.0,0.0
chr3,10,C,A,1.0,1.0,1.0,0.0
"
        );
        assert_eq!(
            v,
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPOP1\tPOP2\tPOP3\tpop1_pop3_diff
chr2\t977029\t.\tG\tA\t30\t.\tDP=30\tAF\t1.0\t1.0\t1.0\t0.0
chr2\t977052\t.\tT\tC\t30\t.\tDP=30\tAF\t1.0\t0.933\t1.0\t0.0
chr3\t10\t.\tC\tA\t30\t.\tDP=30\tAF\t1.0\t1.0\t1.0\t0.0
"
        );
        assert_eq!(stats.summary.sites, 5);
        assert_eq!(stats.summary.retained, 3);
        assert_eq!(stats.out_of_region, 0);
    }

    #[test]
    fn per_contig_regions() {
        let mut h = HashMap::new();
        h.insert(
            Arc::from("chr2"),
            vec![Region::new(977029, 977040).unwrap()],
        );
        let cfg = config(RegionMap::PerContig(h), None, MalformedPolicy::Abort);
        let (f, _, stats) = run(&cfg, SYNC).unwrap();
        // chr3 has no regions so is processed in full
        assert_eq!(
            f,
            "chromosome,position,ref,alt,POP1,POP2,POP3
chr2,977029,G,A,1.0,1.0,1.0
chr3,10,C,A,1.0,1.0,1.0
"
        );
        assert_eq!(stats.out_of_region, 2);
    }

    #[test]
    fn malformed_policy() {
        let input = format!("{}chr3\t11\tC\t30:0:0:0:0\t30:0:0:0:0:0\t30:0:0:0:0:0\nchr3\t12\tA\t0:30:0:0:0:0\t0:30:0:0:0:0\t0:30:0:0:0:0\n", SYNC);

        let cfg = config(RegionMap::Unrestricted, None, MalformedPolicy::Abort);
        let e = run(&cfg, &input).unwrap_err();
        assert!(format!("{:#}", e).contains("test.sync:6"));

        let cfg = config(RegionMap::Unrestricted, None, MalformedPolicy::Skip);
        let (f, _, stats) = run(&cfg, &input).unwrap();
        assert_eq!(stats.skipped, 1);
        assert!(f.ends_with("chr3,12,A,T,1.0,1.0,1.0\n"));
    }

    #[test]
    fn ref_count_above_depth() {
        let input = "chr2\t5\tA\t31:0:0:0:0:0\t0:30:0:0:0:0\t0:30:0:0:0:0\n";
        let cfg = config(RegionMap::Unrestricted, None, MalformedPolicy::Abort);
        let e = run(&cfg, input).unwrap_err();
        assert!(format!("{:#}", e).contains("test.sync:1 Error processing SYNC row (chr2:5)"));

        let cfg = config(RegionMap::Unrestricted, None, MalformedPolicy::Skip);
        let (_, _, stats) = run(&cfg, input).unwrap();
        assert_eq!(stats.skipped, 1);
    }
}

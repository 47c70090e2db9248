//! Text presentation of frequency summaries
//!
//! Column names and order are fixed by the FreqConfig (and the with_counts
//! option) and are applied here only; the records themselves just hold
//! per-population values in configuration order.

use std::fmt::{self, Formatter};

use crate::{allele::Allele, config::FreqConfig, freq::FrequencyRecord, region::Region};

/// Format a frequency in shortest form keeping at least one decimal place,
/// i.e., 1.0, 0.5, 0.033
pub fn fmt_freq(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

/// Difference values are derived from already rounded frequencies, so
/// rounding again to 3 places only removes floating point noise
fn fmt_diff(x: f64) -> String {
    fmt_freq(crate::freq::round3(x))
}

#[derive(Debug, Clone, Copy)]
pub struct TableFormat<'a> {
    cfg: &'a FreqConfig,
    with_counts: bool,
}

impl<'a> TableFormat<'a> {
    pub fn new(cfg: &'a FreqConfig, with_counts: bool) -> Self {
        Self { cfg, with_counts }
    }

    pub fn freq_header(&self) -> FreqHeader<'a> {
        FreqHeader(*self)
    }

    pub fn freq_row<'b>(&self, rec: &'b FrequencyRecord) -> FreqRow<'a, 'b> {
        FreqRow { fmt: *self, rec }
    }

    pub fn vcf_header(&self) -> VcfHeader<'a> {
        VcfHeader(*self)
    }

    pub fn vcf_row<'b>(&self, rec: &'b FrequencyRecord) -> VcfRow<'a, 'b> {
        VcfRow { fmt: *self, rec }
    }
}

/// Header line for the comma separated frequency table
pub struct FreqHeader<'a>(TableFormat<'a>);

impl<'a> fmt::Display for FreqHeader<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cfg = self.0.cfg;
        write!(f, "chromosome,position,ref,alt")?;
        if self.0.with_counts {
            for p in cfg.populations() {
                for a in Allele::ALL {
                    write!(f, ",{}_{}", p, a)?
                }
            }
        }
        for p in cfg.populations() {
            write!(f, ",{}", p.to_uppercase())?
        }
        if cfg.genotype() {
            for p in cfg.populations() {
                write!(f, ",{}_GT", p.to_uppercase())?
            }
        }
        if let Some(s) = cfg.diff_name() {
            write!(f, ",{}", s)?
        }
        Ok(())
    }
}

/// Data line for the comma separated frequency table
pub struct FreqRow<'a, 'b> {
    fmt: TableFormat<'a>,
    rec: &'b FrequencyRecord,
}

impl<'a, 'b> fmt::Display for FreqRow<'a, 'b> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let site = self.rec.site();
        write!(
            f,
            "{},{},{},{}",
            site.ctg(),
            site.pos(),
            site.ref_allele(),
            self.rec.alt()
        )?;
        if self.fmt.with_counts {
            for c in site.counts() {
                for a in Allele::ALL {
                    write!(f, ",{}", c.get(a))?
                }
            }
        }
        for p in self.rec.pops() {
            write!(f, ",{}", fmt_freq(p.freq()))?
        }
        if self.fmt.cfg.genotype() {
            for p in self.rec.pops() {
                match p.genotype() {
                    Some(g) => write!(f, ",{}", g)?,
                    None => write!(f, ",.")?,
                }
            }
        }
        if let Some(d) = self.rec.diff() {
            write!(f, ",{}", fmt_diff(d))?
        }
        Ok(())
    }
}

/// Column header line for the tab separated VCF-like report
pub struct VcfHeader<'a>(TableFormat<'a>);

impl<'a> fmt::Display for VcfHeader<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cfg = self.0.cfg;
        write!(f, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT")?;
        for p in cfg.populations() {
            write!(f, "\t{}", p.to_uppercase())?
        }
        if let Some(s) = cfg.diff_name() {
            write!(f, "\t{}", s)?
        }
        Ok(())
    }
}

/// Data line for the VCF-like report
pub struct VcfRow<'a, 'b> {
    fmt: TableFormat<'a>,
    rec: &'b FrequencyRecord,
}

impl<'a, 'b> fmt::Display for VcfRow<'a, 'b> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let site = self.rec.site();
        let cfg = self.fmt.cfg;
        let depth = cfg.depth();
        write!(
            f,
            "{}\t{}\t.\t{}\t{}\t{}\t.\tDP={}\t{}",
            site.ctg(),
            site.pos(),
            site.ref_allele(),
            self.rec.alt(),
            depth,
            depth,
            if cfg.genotype() { "GT:AF" } else { "AF" }
        )?;
        for p in self.rec.pops() {
            match p.genotype() {
                Some(g) => write!(f, "\t{}:{}", g, fmt_freq(p.freq()))?,
                None => write!(f, "\t{}", fmt_freq(p.freq()))?,
            }
        }
        if let Some(d) = self.rec.diff() {
            write!(f, "\t{}", fmt_diff(d))?
        }
        Ok(())
    }
}

/// Header for per-chromosome region tables
pub const REGION_HEADER: &str = "start,end";

/// Data line for a region table
pub fn region_row(r: &Region) -> String {
    format!("{}", r)
}

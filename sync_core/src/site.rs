use std::sync::Arc;

use crate::{
    allele::{AlleleCounts, RefAllele},
    Contig, Result, SyncError,
};

/// One row of a SYNC table
///
/// counts has one entry per configured population, in configuration order
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    ctg: Contig,
    pos: u64,
    ref_allele: RefAllele,
    counts: Vec<AlleleCounts>,
}

impl SiteRecord {
    pub fn new(ctg: Contig, pos: u64, ref_allele: RefAllele, counts: Vec<AlleleCounts>) -> Self {
        Self {
            ctg,
            pos,
            ref_allele,
            counts,
        }
    }

    pub fn ctg(&self) -> &Contig {
        &self.ctg
    }

    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn ref_allele(&self) -> &RefAllele {
        &self.ref_allele
    }

    pub fn counts(&self) -> &[AlleleCounts] {
        &self.counts
    }
}

/// Builds SiteRecords from split SYNC lines
///
/// Consecutive rows nearly always share a chromosome, so the last contig name
/// is kept and reused rather than allocating a new one for every row
pub struct SiteParser {
    n_pops: usize,
    last_ctg: Option<Contig>,
}

impl SiteParser {
    pub fn new(n_pops: usize) -> Self {
        Self {
            n_pops,
            last_ctg: None,
        }
    }

    fn contig(&mut self, name: &str) -> Contig {
        match &self.last_ctg {
            Some(c) if &**c == name => Arc::clone(c),
            _ => {
                trace!("New contig {} in SYNC input", name);
                let c: Contig = Arc::from(name);
                self.last_ctg = Some(Arc::clone(&c));
                c
            }
        }
    }

    /// Parse the fields of one SYNC line: chromosome, position, reference
    /// allele and then one count string per population
    pub fn parse(&mut self, fields: &[&str]) -> Result<SiteRecord> {
        if fields.len() != self.n_pops + 3 {
            return Err(SyncError::parse(format!(
                "Expected {} columns ({} populations), found {}",
                self.n_pops + 3,
                self.n_pops,
                fields.len()
            )));
        }
        let pos = fields[1]
            .parse::<u64>()
            .map_err(|_| SyncError::parse(format!("Illegal position {:?}", fields[1])))?;
        let ref_allele = fields[2].parse::<RefAllele>()?;
        let counts = fields[3..]
            .iter()
            .map(|s| s.parse::<AlleleCounts>())
            .collect::<Result<Vec<_>>>()?;
        let ctg = self.contig(fields[0]);
        Ok(SiteRecord::new(ctg, pos, ref_allele, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::Allele;

    #[test]
    fn parse_line() {
        let mut p = SiteParser::new(3);
        let s = p
            .parse(&["chr2", "977029", "G", "30:0:0:0:0:0", "29:0:0:1:0:0", "30:0:0:0:0:0"])
            .unwrap();
        assert_eq!(&**s.ctg(), "chr2");
        assert_eq!(s.pos(), 977029);
        assert_eq!(s.ref_allele(), &RefAllele::Base(Allele::G));
        assert_eq!(s.counts().len(), 3);
        assert_eq!(s.counts()[1].get(Allele::G), 1);

        // Contig name is shared between consecutive rows
        let s1 = p
            .parse(&["chr2", "977030", "A", "30:0:0:0:0:0", "30:0:0:0:0:0", "30:0:0:0:0:0"])
            .unwrap();
        assert!(Arc::ptr_eq(s.ctg(), s1.ctg()));
    }

    #[test]
    fn malformed_lines() {
        let mut p = SiteParser::new(2);
        // Wrong number of populations
        assert!(p.parse(&["chr2", "84", "A", "30:0:0:0:0:0"]).is_err());
        // Bad position
        assert!(p
            .parse(&["chr2", "8x4", "A", "30:0:0:0:0:0", "30:0:0:0:0:0"])
            .is_err());
        // Bad count string
        let e = p
            .parse(&["chr2", "84", "A", "30:0:0:0:0:0", "30:0:0:0:0"])
            .unwrap_err();
        assert!(e.is_parse());
    }
}

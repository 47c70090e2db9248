use std::{fmt, str::FromStr};

use crate::SyncError;

/// Bases considered when calling the alternate allele.
///
/// The declaration order is also the tie-break order: when two or more
/// bases share the maximum count, the first in [`Allele::ALL`] wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Allele {
    A,
    T,
    C,
    G,
}

impl Allele {
    pub const ALL: [Allele; 4] = [Allele::A, Allele::T, Allele::C, Allele::G];

    /// Index of this allele in a SYNC count tuple (A:T:C:G:N:DEL)
    pub fn idx(&self) -> usize {
        *self as usize
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::A => 'A',
            Self::T => 'T',
            Self::C => 'C',
            Self::G => 'G',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'T' => Some(Self::T),
            'C' => Some(Self::C),
            'G' => Some(Self::G),
            _ => None,
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Reference base of a SYNC row
///
/// Anything that is not one of A/T/C/G/N is kept verbatim as Other so that it
/// can be written back out unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefAllele {
    Base(Allele),
    N,
    Other(String),
}

impl RefAllele {
    pub fn allele(&self) -> Option<Allele> {
        match self {
            Self::Base(a) => Some(*a),
            _ => None,
        }
    }

    /// Returns true if the reference is one of A/T/C/G
    pub fn is_base(&self) -> bool {
        matches!(self, Self::Base(_))
    }
}

impl FromStr for RefAllele {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut it = s.chars();
        match (it.next(), it.next()) {
            (None, _) => Err(SyncError::parse("Empty reference allele")),
            (Some(c), None) => Ok(if let Some(a) = Allele::from_char(c) {
                Self::Base(a)
            } else if c.eq_ignore_ascii_case(&'N') {
                Self::N
            } else {
                Self::Other(s.to_owned())
            }),
            _ => Ok(Self::Other(s.to_owned())),
        }
    }
}

impl fmt::Display for RefAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(a) => write!(f, "{}", a),
            Self::N => f.write_str("N"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

pub const N_IDX: usize = 4;

/// Read counts for one population at one site, in SYNC order A:T:C:G:N:DEL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlleleCounts([u32; 6]);

impl AlleleCounts {
    pub fn new(counts: [u32; 6]) -> Self {
        Self(counts)
    }

    pub fn get(&self, a: Allele) -> u32 {
        self.0[a.idx()]
    }

    pub fn n(&self) -> u32 {
        self.0[N_IDX]
    }

    /// Count supporting the reference allele.
    ///
    /// An N reference uses the N field.  Other symbols have no matching field
    /// and so give 0.
    pub fn ref_count(&self, r: &RefAllele) -> u32 {
        match r {
            RefAllele::Base(a) => self.get(*a),
            RefAllele::N => self.n(),
            RefAllele::Other(_) => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|x| *x as u64).sum()
    }
}

impl FromStr for AlleleCounts {
    type Err = SyncError;

    /// Parse a SYNC count string (i.e., 30:0:0:0:0:0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut counts = [0; 6];
        let mut n = 0;
        for f in s.split(':') {
            if n >= 6 {
                return Err(SyncError::parse(format!(
                    "Count string {} has more than 6 fields",
                    s
                )));
            }
            counts[n] = f.trim().parse::<u32>().map_err(|_| {
                SyncError::parse(format!("Illegal count {:?} in count string {}", f, s))
            })?;
            n += 1;
        }
        if n != 6 {
            Err(SyncError::parse(format!(
                "Count string {} has {} fields (expected 6)",
                s, n
            )))
        } else {
            Ok(Self(counts))
        }
    }
}

impl fmt::Display for AlleleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.0;
        write!(f, "{}:{}:{}:{}:{}:{}", c[0], c[1], c[2], c[3], c[4], c[5])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allele_order() {
        assert_eq!(Allele::ALL.map(|a| a.idx()), [0, 1, 2, 3]);
        assert!(Allele::A < Allele::T && Allele::T < Allele::C && Allele::C < Allele::G);
        assert_eq!(Allele::from_char('g'), Some(Allele::G));
        assert_eq!(Allele::from_char('N'), None);
    }

    #[test]
    fn parse_ref() {
        assert_eq!("A".parse::<RefAllele>().unwrap(), RefAllele::Base(Allele::A));
        assert_eq!("c".parse::<RefAllele>().unwrap(), RefAllele::Base(Allele::C));
        assert_eq!("N".parse::<RefAllele>().unwrap(), RefAllele::N);
        assert_eq!(
            "R".parse::<RefAllele>().unwrap(),
            RefAllele::Other("R".to_owned())
        );
        assert!("".parse::<RefAllele>().is_err());
        assert_eq!(format!("{}", "R".parse::<RefAllele>().unwrap()), "R");
    }

    #[test]
    fn parse_counts() {
        let c: AlleleCounts = "1:22:3:4:0:0".parse().unwrap();
        assert_eq!(c.get(Allele::T), 22);
        assert_eq!(c.total(), 30);
        assert_eq!(format!("{}", c), "1:22:3:4:0:0");

        let c: AlleleCounts = "0:0:0:0:5:7".parse().unwrap();
        assert_eq!(c.n(), 5);
        assert_eq!(c.total(), 12);
        assert_eq!(c.ref_count(&RefAllele::N), 5);
        assert_eq!(c.ref_count(&RefAllele::Other("R".to_owned())), 0);
    }

    #[test]
    fn bad_counts() {
        for s in [
            "30:0:0:0:0",
            "30:0:0:0:0:0:0",
            "30:0:x:0:0:0",
            "30:0:-1:0:0:0",
            "",
            "30::0:0:0:0",
        ] {
            let e = s.parse::<AlleleCounts>().unwrap_err();
            assert!(e.is_parse(), "{} should fail to parse", s);
        }
    }
}

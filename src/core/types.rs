use serde::{Deserialize, Serialize};

/// A single nucleotide as observed in a read or carried by a genotype call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
    /// Anything outside `ACGT`, including `N` and positions with no aligned base
    Other,
}

impl Base {
    /// Map an ASCII symbol to a base. Lowercase (soft-masked) bases are accepted.
    #[must_use]
    pub fn from_ascii(symbol: u8) -> Self {
        match symbol.to_ascii_uppercase() {
            b'A' => Self::A,
            b'C' => Self::C,
            b'G' => Self::G,
            b'T' => Self::T,
            _ => Self::Other,
        }
    }
}

impl From<char> for Base {
    fn from(c: char) -> Self {
        u8::try_from(c).map_or(Self::Other, Self::from_ascii)
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::C => write!(f, "C"),
            Self::G => write!(f, "G"),
            Self::T => write!(f, "T"),
            Self::Other => write!(f, "N"),
        }
    }
}

/// The reference span a read aligns to.
///
/// Coordinates are 1-based and inclusive at both ends, the same convention
/// VCF positions use. Overlap queries against a variant source are only
/// meaningful when both sides agree on this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicInterval {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// Check whether `position` lies inside the interval (inclusive)
    #[must_use]
    pub fn contains(&self, position: u64) -> bool {
        self.start <= position && position <= self.end
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// Verdict for a read, either against a single variant or across all of them.
///
/// The four values form a join-semilattice under [`Classification::combine`]:
/// `Ambiguous` is the identity, `Conflict` is absorbing, and `Var1`/`Var2`
/// are incomparable (joining them yields `Conflict`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Consistent with genotype 1 only
    Var1,
    /// Consistent with genotype 2 only
    Var2,
    /// No information distinguishing the two genotypes
    #[default]
    Ambiguous,
    /// Evidence for both genotypes, or for neither
    Conflict,
}

impl Classification {
    pub const ALL: [Self; 4] = [Self::Var1, Self::Var2, Self::Ambiguous, Self::Conflict];

    /// Combine two verdicts.
    ///
    /// | combine   | Var1     | Var2     | Ambiguous | Conflict |
    /// |-----------|----------|----------|-----------|----------|
    /// | Var1      | Var1     | Conflict | Var1      | Conflict |
    /// | Var2      | Conflict | Var2     | Var2      | Conflict |
    /// | Ambiguous | Var1     | Var2     | Ambiguous | Conflict |
    /// | Conflict  | Conflict | Conflict | Conflict  | Conflict |
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Ambiguous, x) | (x, Self::Ambiguous) => x,
            (Self::Var1, Self::Var1) => Self::Var1,
            (Self::Var2, Self::Var2) => Self::Var2,
            _ => Self::Conflict,
        }
    }

    /// True for the absorbing element; no further combination can change it
    #[must_use]
    pub const fn is_conflict(self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Var1 => write!(f, "VAR1"),
            Self::Var2 => write!(f, "VAR2"),
            Self::Ambiguous => write!(f, "AMBIGUOUS"),
            Self::Conflict => write!(f, "CONFLICT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Classification::{Ambiguous, Conflict, Var1, Var2};

    #[test]
    fn test_combine_table() {
        let expected = [
            (Var1, Var1, Var1),
            (Var1, Var2, Conflict),
            (Var1, Ambiguous, Var1),
            (Var1, Conflict, Conflict),
            (Var2, Var1, Conflict),
            (Var2, Var2, Var2),
            (Var2, Ambiguous, Var2),
            (Var2, Conflict, Conflict),
            (Ambiguous, Var1, Var1),
            (Ambiguous, Var2, Var2),
            (Ambiguous, Ambiguous, Ambiguous),
            (Ambiguous, Conflict, Conflict),
            (Conflict, Var1, Conflict),
            (Conflict, Var2, Conflict),
            (Conflict, Ambiguous, Conflict),
            (Conflict, Conflict, Conflict),
        ];

        for (a, b, c) in expected {
            assert_eq!(a.combine(b), c, "{a} combine {b}");
        }
    }

    #[test]
    fn test_combine_is_commutative_and_associative() {
        for a in Classification::ALL {
            for b in Classification::ALL {
                assert_eq!(a.combine(b), b.combine(a));
                for c in Classification::ALL {
                    assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
                }
            }
        }
    }

    #[test]
    fn test_identity_and_absorption() {
        for x in Classification::ALL {
            assert_eq!(x.combine(Ambiguous), x);
            assert_eq!(x.combine(Conflict), Conflict);
            // Idempotent
            assert_eq!(x.combine(x), x);
        }
        assert_eq!(Classification::default(), Ambiguous);
    }

    #[test]
    fn test_base_from_ascii() {
        assert_eq!(Base::from_ascii(b'A'), Base::A);
        assert_eq!(Base::from_ascii(b'g'), Base::G);
        assert_eq!(Base::from_ascii(b'N'), Base::Other);
        assert_eq!(Base::from_ascii(b'.'), Base::Other);
        assert_eq!(Base::from('t'), Base::T);
        assert_eq!(Base::from('é'), Base::Other);
    }

    #[test]
    fn test_interval_contains() {
        let interval = GenomicInterval::new("chr1", 100, 150);
        assert!(interval.contains(100));
        assert!(interval.contains(150));
        assert!(!interval.contains(99));
        assert!(!interval.contains(151));
        assert_eq!(interval.to_string(), "chr1:100-150");
    }
}

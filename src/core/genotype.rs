use serde::{Deserialize, Serialize};

use crate::core::types::Base;

/// Separator between the two alleles of an unphased call
pub const UNPHASED_SEPARATOR: char = '/';

/// Separator between the two alleles of a phased call
pub const PHASED_SEPARATOR: char = '|';

/// Symbol for a missing allele
pub const MISSING_ALLELE: &str = ".";

/// Alleles an informative call may carry
const NUCLEOTIDES: &[u8] = b"ACGT";

/// A per-sample genotype call at one site, held in its textual form (e.g. `"A/A"`).
///
/// Alleles are the REF/ALT bases the call refers to, not allele indices.
/// Only a call made of exactly one nucleotide (`A`, `C`, `G` or `T`), one
/// separator and the same nucleotide again is *informative*; anything else
/// (heterozygous, missing, `N`, haploid, polyploid, or multi-base alleles)
/// carries no usable information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenotypeCall(String);

impl GenotypeCall {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Build an unphased call from its alleles, with `None` marking a missing allele
    pub fn from_alleles<'a, I>(alleles: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let alleles: Vec<&str> = alleles
            .into_iter()
            .map(|allele| allele.unwrap_or(MISSING_ALLELE))
            .collect();
        Self(alleles.join(UNPHASED_SEPARATOR.to_string().as_str()))
    }

    /// A call for a sample with no genotype recorded at the site
    #[must_use]
    pub fn missing() -> Self {
        Self(MISSING_ALLELE.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The individual alleles, in call order
    pub fn alleles(&self) -> impl Iterator<Item = &str> {
        self.0.split(is_separator)
    }

    /// Whether two calls carry the same alleles, ignoring order and phasing
    #[must_use]
    pub fn same_genotype(&self, other: &Self) -> bool {
        let mut a: Vec<&str> = self.alleles().collect();
        let mut b: Vec<&str> = other.alleles().collect();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }

    /// The single allele of an informative (simple homozygous diploid) call.
    ///
    /// Returns `None` unless the text is exactly `allele, separator, allele`
    /// with both alleles the same upper-case nucleotide. Two distinct calls
    /// therefore never resolve to the same base.
    #[must_use]
    pub fn homozygous_base(&self) -> Option<Base> {
        let [first, separator, second] = <[u8; 3]>::try_from(self.0.as_bytes()).ok()?;

        if is_separator(char::from(separator)) && first == second && NUCLEOTIDES.contains(&first) {
            Some(Base::from_ascii(first))
        } else {
            None
        }
    }
}

fn is_separator(c: char) -> bool {
    c == UNPHASED_SEPARATOR || c == PHASED_SEPARATOR
}

impl std::fmt::Display for GenotypeCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GenotypeCall {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

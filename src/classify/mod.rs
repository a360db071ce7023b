//! Read-to-genotype classification engine.
//!
//! A read is compared against every variant its alignment overlaps:
//!
//! 1. **Per-variant verdict** ([`classify_snp`]): the read's base at the
//!    variant position is matched against the homozygous allele each of the
//!    two genotypes carries there.
//! 2. **Per-read verdict** ([`ReadClassifier`]): the per-variant verdicts are
//!    folded with [`Classification::combine`], stopping at the first
//!    `Conflict` since nothing can undo it.
//!
//! The engine only sees reads and variants through the [`AlignedRead`],
//! [`Variant`] and [`VariantSource`] traits, so it can be driven by the
//! noodles-backed adapters in [`crate::parsing`] or by in-memory fakes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use allele_sorter::classify::{ReadClassifier, SamplePair};
//! use allele_sorter::parsing::alignment::AlignmentReader;
//! use allele_sorter::parsing::vcf::VariantIndex;
//! use std::path::Path;
//!
//! let samples = SamplePair::new("CAST", "B6").unwrap();
//! let index = VariantIndex::from_path(Path::new("snps.vcf.gz"), &samples).unwrap();
//! let classifier = ReadClassifier::new(samples);
//!
//! let mut reader = AlignmentReader::from_path(Path::new("reads.bam")).unwrap();
//! while let Some(read) = reader.next_read().unwrap() {
//!     let verdict = classifier.classify_read(&read, &index).unwrap();
//!     println!("{verdict}");
//! }
//! ```

use thiserror::Error;

use crate::core::contig::TranslationError;
use crate::core::genotype::GenotypeCall;
use crate::core::types::{Base, GenomicInterval};

pub mod read;
pub mod snp;

pub use read::{classify_read, fold_classifications, ReadClassifier};
pub use snp::classify_snp;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("Sample '{sample}' not found in the genotypes of the variant at position {position}")]
    MissingSample { sample: String, position: u64 },
}

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Variant(#[from] VariantError),

    #[error("Variant source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Genotype names must differ, got '{0}' twice")]
pub struct DuplicateSampleError(pub String);

/// The two sample identifiers reads are sorted between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    genotype1: String,
    genotype2: String,
}

impl SamplePair {
    /// # Errors
    ///
    /// Returns `DuplicateSampleError` if both names are the same.
    pub fn new(
        genotype1: impl Into<String>,
        genotype2: impl Into<String>,
    ) -> Result<Self, DuplicateSampleError> {
        let genotype1 = genotype1.into();
        let genotype2 = genotype2.into();

        if genotype1 == genotype2 {
            return Err(DuplicateSampleError(genotype1));
        }

        Ok(Self {
            genotype1,
            genotype2,
        })
    }

    #[must_use]
    pub fn genotype1(&self) -> &str {
        &self.genotype1
    }

    #[must_use]
    pub fn genotype2(&self) -> &str {
        &self.genotype2
    }
}

/// An aligned read, as far as classification needs to see it
pub trait AlignedRead {
    /// Reference span of the alignment, or `None` for an unmapped read
    fn interval(&self) -> Option<GenomicInterval>;

    /// The read base aligned to a 1-based reference position.
    ///
    /// Positions inside a deletion or skip, or outside the aligned span,
    /// yield [`Base::Other`].
    fn base_at_reference_position(&self, position: u64) -> Base;
}

/// A called site with per-sample genotypes
pub trait Variant {
    /// 1-based position of the site
    fn position(&self) -> u64;

    /// The genotype call of one sample at this site
    ///
    /// # Errors
    ///
    /// Returns `VariantError::MissingSample` if the site has no genotype
    /// column for `sample`.
    fn genotype_call_for(&self, sample: &str) -> Result<&GenotypeCall, VariantError>;
}

impl<T: Variant + ?Sized> Variant for &T {
    fn position(&self) -> u64 {
        (**self).position()
    }

    fn genotype_call_for(&self, sample: &str) -> Result<&GenotypeCall, VariantError> {
        (**self).genotype_call_for(sample)
    }
}

/// Iterator over the variants a query produced
pub type VariantIter<'a, V, E> = Box<dyn Iterator<Item = Result<V, E>> + 'a>;

/// Random access to variants by genomic interval
pub trait VariantSource {
    type Variant<'a>: Variant
    where
        Self: 'a;

    type Error: std::error::Error + Send + Sync + 'static;

    /// All variants whose position lies within `interval` (inclusive at both
    /// ends), in the order the source stores them.
    ///
    /// The returned iterator is consumed at most once and lazily, so callers
    /// may stop early.
    ///
    /// # Errors
    ///
    /// Returns the source's error type if the query cannot be started.
    fn query_overlapping<'a>(
        &'a self,
        interval: &GenomicInterval,
    ) -> Result<VariantIter<'a, Self::Variant<'a>, Self::Error>, Self::Error>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_pair_rejects_duplicates() {
        assert!(SamplePair::new("CAST", "B6").is_ok());

        let err = SamplePair::new("CAST", "CAST").unwrap_err();
        assert_eq!(err, DuplicateSampleError("CAST".to_string()));
    }

    #[test]
    fn test_fake_read_bases() {
        let read = testing::FakeRead::new("chr1", 100, "ACGT");
        assert_eq!(read.interval(), Some(GenomicInterval::new("chr1", 100, 103)));
        assert_eq!(read.base_at_reference_position(100), Base::A);
        assert_eq!(read.base_at_reference_position(103), Base::T);
        assert_eq!(read.base_at_reference_position(99), Base::Other);
        assert_eq!(read.base_at_reference_position(104), Base::Other);
    }
}

//! Core data types for read-to-genotype classification.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Classification`]: The four-valued verdict and its combination rule
//! - [`Base`], [`GenomicInterval`]: Observed bases and read spans
//! - [`GenotypeCall`]: A textual diploid call such as `A/A`
//! - [`ChromosomeNameTranslator`]: UCSC <-> NCBI chromosome names
//!
//! ## Chromosome Naming
//!
//! Different reference sources use different naming conventions:
//!
//! | Source | Chromosome 1 | Mitochondrial |
//! |--------|--------------|---------------|
//! | UCSC   | chr1         | chrM          |
//! | NCBI   | 1            | MT            |
//! | Ensembl| 1            | MT            |
//!
//! When the alignment and variant files disagree, names are translated
//! through a fixed table before variant lookups.

pub mod contig;
pub mod genotype;
pub mod types;

pub use contig::{ChromosomeNameTranslator, NamingConvention, TranslationError};
pub use genotype::GenotypeCall;
pub use types::{Base, Classification, GenomicInterval};

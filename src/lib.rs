//! # allele-sorter
//!
//! A library for assigning sequencing reads from a hybrid sample to one of its
//! two parental genotypes.
//!
//! In an F1 cross every read comes from one of two parental haplotypes. Where
//! the parents are homozygous for different bases, the base a read carries
//! says which parent it came from. `allele-sorter` checks every such site a
//! read overlaps and assigns it to one genotype, or marks it ambiguous (no
//! informative site) or conflicting (evidence for both, or for neither).
//!
//! ## Features
//!
//! - **Per-site verdicts**: Homozygous diploid SNV calls, phased or unphased
//! - **Early exit**: A read stops being examined once it conflicts
//! - **Name translation**: `chr1`-style and `1`-style chromosome names
//! - **BAM and SAM input**: Output split into four BAM files
//!
//! ## Example
//!
//! ```rust
//! use allele_sorter::{Classification, GenotypeCall};
//!
//! // Only homozygous calls of a single base are informative
//! assert!(GenotypeCall::new("A/A").homozygous_base().is_some());
//! assert!(GenotypeCall::new("A/G").homozygous_base().is_none());
//!
//! // Ambiguous is the identity, Conflict absorbs everything
//! assert_eq!(Classification::Ambiguous.combine(Classification::Var1), Classification::Var1);
//! assert_eq!(Classification::Var1.combine(Classification::Var2), Classification::Conflict);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Classifications, genotype calls, and chromosome name translation
//! - [`classify`]: The read classification engine and its input traits
//! - [`parsing`]: VCF and SAM/BAM adapters built on noodles
//! - [`output`]: Per-classification BAM writers and read counts
//! - [`cli`]: Command-line interface implementation

pub mod classify;
pub mod cli;
pub mod core;
pub mod output;
pub mod parsing;

// Re-export commonly used types for convenience
pub use classify::{ReadClassifier, SamplePair};
pub use core::contig::ChromosomeNameTranslator;
pub use core::genotype::GenotypeCall;
pub use core::types::*;
pub use output::ClassificationCounts;

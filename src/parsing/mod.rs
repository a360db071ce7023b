//! Adapters from genomics file formats to the classification traits.
//!
//! - **VCF / VCF.gz** ([`vcf::VariantIndex`]): sites and the genotype calls of
//!   two samples, queryable by interval
//! - **SAM / BAM** ([`alignment::AlignmentReader`]): alignment records that
//!   expose their span and per-position bases
//!
//! Both are backed by noodles.
//!
//! ## Coordinates
//!
//! All positions are 1-based and inclusive, as in VCF. A read aligned at
//! `100` with CIGAR `5M` spans `100-104`.

use thiserror::Error;

pub mod alignment;
pub mod vcf;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Genotype '{0}' not found among the VCF samples")]
    MissingSample(String),
}

//! Command-line interface for allele-sorter.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **split**: Sort the reads of a BAM/SAM file into per-genotype BAM files
//! - **check**: Validate a VCF against two genotypes and count usable sites
//!
//! ## Usage
//!
//! ```text
//! # Sort reads between two parental strains
//! allele-sorter split --vcf snps.vcf.gz --bam hybrid.bam --gt1 CAST --gt2 B6
//!
//! # The BAM uses chr1-style names, the VCF uses 1-style names
//! allele-sorter split --vcf snps.vcf.gz --bam hybrid.bam --gt1 CAST --gt2 B6 --convert
//!
//! # JSON counts for scripting
//! allele-sorter --format json split --vcf snps.vcf.gz --bam hybrid.bam --gt1 CAST --gt2 B6
//!
//! # How many sites can tell the genotypes apart?
//! allele-sorter check --vcf snps.vcf.gz --gt1 CAST --gt2 B6
//! ```

use clap::{Parser, Subcommand};

pub mod check;
pub mod split;

#[derive(Parser)]
#[command(name = "allele-sorter")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Sort reads into per-genotype sets using homozygous SNVs")]
#[command(
    long_about = "allele-sorter assigns each read of a hybrid sample to one of two parental genotypes.\n\nEvery read is compared with the variants it overlaps. Sites where both genotypes are homozygous for different bases decide the assignment:\n- Reads consistent with only one genotype go to that genotype's file\n- Reads without informative sites are ambiguous\n- Reads supporting both genotypes, or neither, are conflicting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sort the reads of a BAM/SAM file by genotype
    Split(split::SplitArgs),

    /// Check a VCF for two genotypes and count discriminating sites
    Check(check::CheckArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::warn;

use crate::classify::SamplePair;
use crate::cli::OutputFormat;
use crate::core::contig::detect_naming_convention;
use crate::parsing::vcf::{ChromosomeSummary, VariantIndex};

#[derive(Args)]
pub struct CheckArgs {
    /// VCF with genotype calls for both genotypes (plain or BGZF-compressed)
    #[arg(long)]
    pub vcf: PathBuf,

    /// Name of the first genotype, as in the VCF header
    #[arg(long)]
    pub gt1: String,

    /// Name of the second genotype, as in the VCF header
    #[arg(long)]
    pub gt2: String,
}

pub fn run(args: CheckArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let samples = SamplePair::new(&args.gt1, &args.gt2)?;

    let index = VariantIndex::from_path(&args.vcf, &samples)
        .with_context(|| format!("Failed to load variants from {}", args.vcf.display()))?;

    let summary = index.summary();

    let unsupported: usize = summary.iter().map(|c| c.unsupported_sites).sum();
    if unsupported > 0 {
        warn!(
            sites = unsupported,
            "Sites with differing but non-homozygous or multi-base calls will be treated as ambiguous"
        );
    }

    if verbose {
        eprintln!(
            "Chromosome naming: {:?}",
            detect_naming_convention(index.chromosomes())
        );
    }

    match format {
        OutputFormat::Text => print_text_summary(&samples, &summary),
        OutputFormat::Json => print_json_summary(&samples, &summary)?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn totals(summary: &[ChromosomeSummary]) -> (usize, usize, usize) {
    summary.iter().fold((0, 0, 0), |(s, d, u), c| {
        (
            s + c.sites,
            d + c.discriminating_sites,
            u + c.unsupported_sites,
        )
    })
}

fn print_text_summary(samples: &SamplePair, summary: &[ChromosomeSummary]) {
    println!(
        "Sites for {} vs {}",
        samples.genotype1(),
        samples.genotype2()
    );
    println!("{}", "=".repeat(60));
    println!(
        "  {:<16} {:>12} {:>15} {:>12}",
        "chromosome", "sites", "discriminating", "unsupported"
    );

    for c in summary {
        println!(
            "  {:<16} {:>12} {:>15} {:>12}",
            c.chromosome, c.sites, c.discriminating_sites, c.unsupported_sites
        );
    }

    let (sites, discriminating, unsupported) = totals(summary);
    println!(
        "  {:<16} {:>12} {:>15} {:>12}",
        "total", sites, discriminating, unsupported
    );

    if discriminating == 0 {
        println!("\nNo site distinguishes the two genotypes; every read would be ambiguous.");
    }
}

fn print_json_summary(samples: &SamplePair, summary: &[ChromosomeSummary]) -> anyhow::Result<()> {
    let (sites, discriminating, unsupported) = totals(summary);

    let output = serde_json::json!({
        "genotype1": samples.genotype1(),
        "genotype2": samples.genotype2(),
        "sites": sites,
        "discriminating_sites": discriminating,
        "unsupported_sites": unsupported,
        "chromosomes": summary,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(summary: &[ChromosomeSummary]) {
    println!("chromosome\tsites\tdiscriminating_sites\tunsupported_sites");
    for c in summary {
        println!(
            "{}\t{}\t{}\t{}",
            c.chromosome, c.sites, c.discriminating_sites, c.unsupported_sites
        );
    }
}

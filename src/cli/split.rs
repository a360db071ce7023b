use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use noodles::sam;
use tracing::{debug, warn};

use crate::classify::{ReadClassifier, SamplePair};
use crate::cli::OutputFormat;
use crate::core::contig::{detect_naming_convention, ChromosomeNameTranslator, NamingConvention};
use crate::core::types::Classification;
use crate::output::{default_prefix, ClassificationCounts, OutputPaths, ReadRouter};
use crate::parsing::alignment::AlignmentReader;
use crate::parsing::vcf::VariantIndex;

#[derive(Args)]
pub struct SplitArgs {
    /// VCF with genotype calls for both genotypes (plain or BGZF-compressed)
    #[arg(long)]
    pub vcf: PathBuf,

    /// Reads to sort (BAM or SAM)
    #[arg(long)]
    pub bam: PathBuf,

    /// Name of the first genotype, as in the VCF header
    #[arg(long)]
    pub gt1: String,

    /// Name of the second genotype, as in the VCF header
    #[arg(long)]
    pub gt2: String,

    /// Chromosome names in the BAM and VCF use different notations
    /// (e.g. "chr1" vs "1")
    #[arg(long)]
    pub convert: bool,

    /// Prefix for the output files [default: input path without .bam/.sam]
    #[arg(short, long)]
    pub output_prefix: Option<PathBuf>,
}

pub fn run(args: SplitArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let samples = SamplePair::new(&args.gt1, &args.gt2)?;

    let index = VariantIndex::from_path(&args.vcf, &samples)
        .with_context(|| format!("Failed to load variants from {}", args.vcf.display()))?;

    let mut reader = AlignmentReader::from_path(&args.bam)
        .with_context(|| format!("Failed to open alignments {}", args.bam.display()))?;

    check_naming(reader.header(), &index, args.convert);

    let mut classifier = ReadClassifier::new(samples.clone());
    if args.convert {
        classifier = classifier.with_translator(ChromosomeNameTranslator::new());
    }

    let prefix = args
        .output_prefix
        .clone()
        .unwrap_or_else(|| default_prefix(&args.bam));
    let paths = OutputPaths::new(&prefix, &samples);

    if verbose {
        for classification in Classification::ALL {
            eprintln!(
                "{classification} reads -> {}",
                paths.for_classification(classification).display()
            );
        }
    }

    let counts = match sort_reads(&mut reader, &classifier, &index, &paths) {
        Ok(counts) => counts,
        Err(err) => {
            paths.remove_all();
            return Err(err.context(format!(
                "Removed incomplete output files with prefix {}",
                prefix.display()
            )));
        }
    };
    counts.log_summary(&samples);

    match format {
        OutputFormat::Text => print_text_summary(&samples, &counts, &paths),
        OutputFormat::Json => print_json_summary(&samples, &counts, &paths)?,
        OutputFormat::Tsv => print_tsv_summary(&samples, &counts),
    }

    Ok(())
}

/// Classify every read and write it to the file for its classification
fn sort_reads(
    reader: &mut AlignmentReader,
    classifier: &ReadClassifier,
    index: &VariantIndex,
    paths: &OutputPaths,
) -> anyhow::Result<ClassificationCounts> {
    let mut router =
        ReadRouter::create(paths, reader.header()).context("Failed to create output files")?;
    let mut counts = ClassificationCounts::default();

    while let Some(read) = reader.next_read().context("Failed to read alignments")? {
        let classification = classifier
            .classify_read(&read, index)
            .with_context(|| format!("Failed to classify read {}", read.name()))?;

        debug!(read = %read.name(), %classification, "Classified read");

        router
            .route(classification, read.record())
            .context("Failed to write output record")?;
        counts.record(classification);
    }

    router.finish().context("Failed to finish output files")?;
    Ok(counts)
}

/// Warn when the chromosome names of the two inputs look incompatible with
/// the requested translation setting
fn check_naming(header: &sam::Header, index: &VariantIndex, convert: bool) {
    let bam_names: Vec<String> = header
        .reference_sequences()
        .keys()
        .map(ToString::to_string)
        .collect();

    let bam = detect_naming_convention(bam_names.iter().map(String::as_str));
    let vcf = detect_naming_convention(index.chromosomes());

    if naming_mismatch(bam, vcf, convert) {
        if convert {
            warn!(
                bam = ?bam,
                vcf = ?vcf,
                "Chromosome names already agree; --convert will make lookups fail"
            );
        } else {
            warn!(
                bam = ?bam,
                vcf = ?vcf,
                "Chromosome names differ between BAM and VCF; consider --convert"
            );
        }
    }
}

fn naming_mismatch(bam: NamingConvention, vcf: NamingConvention, convert: bool) -> bool {
    if bam == NamingConvention::Mixed || vcf == NamingConvention::Mixed {
        return false;
    }
    (bam != vcf) != convert
}

fn print_text_summary(samples: &SamplePair, counts: &ClassificationCounts, paths: &OutputPaths) {
    println!("Read Classification");
    println!("{}", "=".repeat(60));

    let rows = [
        (samples.genotype1(), Classification::Var1),
        (samples.genotype2(), Classification::Var2),
        ("ambiguous", Classification::Ambiguous),
        ("conflicting", Classification::Conflict),
    ];

    for (label, classification) in rows {
        println!(
            "  {label:<16} {:>12} ({:>5.1}%)  {}",
            counts.get(classification),
            counts.fraction(classification) * 100.0,
            paths.for_classification(classification).display()
        );
    }

    println!("  {:<16} {:>12}", "total", counts.total);
}

fn print_json_summary(
    samples: &SamplePair,
    counts: &ClassificationCounts,
    paths: &OutputPaths,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "genotype1": samples.genotype1(),
        "genotype2": samples.genotype2(),
        "counts": counts,
        "outputs": {
            "genotype1": paths.genotype1,
            "genotype2": paths.genotype2,
            "ambiguous": paths.ambiguous,
            "conflicting": paths.conflicting,
        },
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(samples: &SamplePair, counts: &ClassificationCounts) {
    println!("genotype1\tgenotype2\ttotal\tgenotype1_reads\tgenotype2_reads\tambiguous\tconflicting");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        samples.genotype1(),
        samples.genotype2(),
        counts.total,
        counts.genotype1,
        counts.genotype2,
        counts.ambiguous,
        counts.conflicting
    );
}

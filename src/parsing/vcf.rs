//! In-memory variant index built from a VCF file.
//!
//! Every record is read once with noodles, keeping only its position and the
//! genotype calls of the two samples reads are sorted between. Sites are
//! stored per chromosome in position order, so an overlap query is a range
//! scan. Plain and BGZF-compressed VCF are both accepted.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::io::BufRead;
use std::path::Path;

use noodles::vcf;
use noodles::vcf::variant::record::samples::keys::key;
use noodles::vcf::variant::record_buf::samples::sample::Value;
use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{SamplePair, Variant, VariantError, VariantIter, VariantSource};
use crate::core::genotype::GenotypeCall;
use crate::core::types::GenomicInterval;
use crate::parsing::ParseError;

/// Genotype calls of the two selected samples at one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    calls: [GenotypeCall; 2],
}

impl Site {
    #[must_use]
    pub fn new(genotype1: GenotypeCall, genotype2: GenotypeCall) -> Self {
        Self {
            calls: [genotype1, genotype2],
        }
    }

    /// Whether both calls are informative and differ, i.e. the site can
    /// tell the two genotypes apart
    #[must_use]
    pub fn is_discriminating(&self) -> bool {
        let [gt1, gt2] = &self.calls;
        match (gt1.homozygous_base(), gt2.homozygous_base()) {
            (Some(b1), Some(b2)) => b1 != b2,
            _ => false,
        }
    }

    /// Whether the calls differ but cannot be used, e.g. a heterozygous or
    /// indel call on either side
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        let [gt1, gt2] = &self.calls;
        !gt1.same_genotype(gt2) && !self.is_discriminating()
    }
}

/// A site as seen through a variant query
#[derive(Debug, Clone, Copy)]
pub struct SiteRef<'a> {
    position: u64,
    site: &'a Site,
    samples: &'a SamplePair,
}

impl Variant for SiteRef<'_> {
    fn position(&self) -> u64 {
        self.position
    }

    fn genotype_call_for(&self, sample: &str) -> Result<&GenotypeCall, VariantError> {
        let [gt1, gt2] = &self.site.calls;

        if sample == self.samples.genotype1() {
            Ok(gt1)
        } else if sample == self.samples.genotype2() {
            Ok(gt2)
        } else {
            Err(VariantError::MissingSample {
                sample: sample.to_string(),
                position: self.position,
            })
        }
    }
}

/// Per-chromosome site counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromosomeSummary {
    pub chromosome: String,
    pub sites: usize,
    pub discriminating_sites: usize,
    pub unsupported_sites: usize,
}

/// Sites of a VCF file, restricted to two samples and indexed by position
#[derive(Debug)]
pub struct VariantIndex {
    samples: SamplePair,
    sites: HashMap<String, BTreeMap<u64, Vec<Site>>>,
}

impl VariantIndex {
    #[must_use]
    pub fn new(samples: SamplePair) -> Self {
        Self {
            samples,
            sites: HashMap::new(),
        }
    }

    /// Load a VCF (optionally BGZF-compressed) from disk
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened,
    /// `ParseError::MissingSample` if either sample is absent from the header,
    /// or `ParseError::Noodles`/`ParseError::InvalidFormat` if a record cannot
    /// be parsed.
    pub fn from_path(path: &Path, samples: &SamplePair) -> Result<Self, ParseError> {
        let mut reader = vcf::io::reader::Builder::default().build_from_path(path)?;
        let index = Self::from_reader(&mut reader, samples)?;

        info!(
            path = %path.display(),
            chromosomes = index.sites.len(),
            sites = index.len(),
            "Loaded variant index"
        );

        Ok(index)
    }

    /// Load VCF from text
    ///
    /// # Errors
    ///
    /// See [`VariantIndex::from_path`].
    pub fn from_vcf_text(text: &str, samples: &SamplePair) -> Result<Self, ParseError> {
        let mut reader = vcf::io::Reader::new(text.as_bytes());
        Self::from_reader(&mut reader, samples)
    }

    fn from_reader<R: BufRead>(
        reader: &mut vcf::io::Reader<R>,
        samples: &SamplePair,
    ) -> Result<Self, ParseError> {
        let header = reader
            .read_header()
            .map_err(|e| ParseError::Noodles(e.to_string()))?;

        let sample_indices = [
            sample_index(&header, samples.genotype1())?,
            sample_index(&header, samples.genotype2())?,
        ];

        let mut index = Self::new(samples.clone());
        let mut record = vcf::variant::RecordBuf::default();

        while reader
            .read_record_buf(&header, &mut record)
            .map_err(|e| ParseError::Noodles(e.to_string()))?
            != 0
        {
            let chromosome = record.reference_sequence_name();
            let position = record.variant_start().ok_or_else(|| {
                ParseError::InvalidFormat(format!("Record on '{chromosome}' has no position"))
            })?;

            let alleles: Vec<&str> = std::iter::once(record.reference_bases())
                .chain(record.alternate_bases().as_ref().iter().map(String::as_str))
                .collect();

            let [i1, i2] = sample_indices;
            let site = Site::new(
                genotype_call(&record, i1, &alleles),
                genotype_call(&record, i2, &alleles),
            );

            index.insert(chromosome, usize::from(position) as u64, site);
        }

        debug!(sites = index.len(), "Read all VCF records");

        Ok(index)
    }

    /// Add a site; several sites may share a position
    pub fn insert(&mut self, chromosome: &str, position: u64, site: Site) {
        self.sites
            .entry(chromosome.to_string())
            .or_default()
            .entry(position)
            .or_default()
            .push(site);
    }

    #[must_use]
    pub fn samples(&self) -> &SamplePair {
        &self.samples
    }

    /// Total number of sites
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Chromosome names with at least one site, sorted
    #[must_use]
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Site counts per chromosome, sorted by name
    #[must_use]
    pub fn summary(&self) -> Vec<ChromosomeSummary> {
        self.chromosomes()
            .into_iter()
            .filter_map(|name| {
                let by_position = self.sites.get(name)?;
                let sites = by_position.values().flatten();
                Some(ChromosomeSummary {
                    chromosome: name.to_string(),
                    sites: sites.clone().count(),
                    discriminating_sites: sites.clone().filter(|s| s.is_discriminating()).count(),
                    unsupported_sites: sites.filter(|s| s.is_unsupported()).count(),
                })
            })
            .collect()
    }
}

impl VariantSource for VariantIndex {
    type Variant<'a> = SiteRef<'a>;
    type Error = Infallible;

    fn query_overlapping<'a>(
        &'a self,
        interval: &GenomicInterval,
    ) -> Result<VariantIter<'a, Self::Variant<'a>, Self::Error>, Self::Error> {
        let samples = &self.samples;

        let Some(by_position) = self.sites.get(&interval.chromosome) else {
            return Ok(Box::new(std::iter::empty()));
        };

        // BTreeMap::range panics on an inverted range
        if interval.start > interval.end {
            return Ok(Box::new(std::iter::empty()));
        }

        Ok(Box::new(
            by_position
                .range(interval.start..=interval.end)
                .flat_map(move |(&position, sites)| {
                    sites.iter().map(move |site| {
                        Ok(SiteRef {
                            position,
                            site,
                            samples,
                        })
                    })
                }),
        ))
    }
}

fn sample_index(header: &vcf::Header, sample: &str) -> Result<usize, ParseError> {
    header
        .sample_names()
        .get_index_of(sample)
        .ok_or_else(|| ParseError::MissingSample(sample.to_string()))
}

/// Render one sample's GT as allele bases, e.g. `0/1` with REF `A` and ALT
/// `G` becomes `A/G`
fn genotype_call(
    record: &vcf::variant::RecordBuf,
    sample_index: usize,
    alleles: &[&str],
) -> GenotypeCall {
    let value = record
        .samples()
        .get_index(sample_index)
        .and_then(|sample| sample.get(key::GENOTYPE).flatten());

    match value {
        Some(Value::Genotype(genotype)) => GenotypeCall::from_alleles(
            genotype
                .as_ref()
                .iter()
                .map(|allele| allele.position().and_then(|i| alleles.get(i).copied())),
        ),
        _ => GenotypeCall::missing(),
    }
}

use crate::classify::snp::classify_snp;
use crate::classify::{AlignedRead, ClassifyError, SamplePair, VariantSource};
use crate::core::contig::ChromosomeNameTranslator;
use crate::core::types::Classification;

/// Fold per-variant verdicts into one, stopping at the first `Conflict`.
///
/// Items after a `Conflict` are never pulled from the iterator, and neither
/// are errors they would have produced. Because `Conflict` absorbs
/// everything, the result is the same as combining every item.
///
/// # Errors
///
/// Returns the first error reached before a `Conflict`.
pub fn fold_classifications<I, E>(verdicts: I) -> Result<Classification, E>
where
    I: IntoIterator<Item = Result<Classification, E>>,
{
    let mut result = Classification::Ambiguous;

    for verdict in verdicts {
        result = result.combine(verdict?);
        if result.is_conflict() {
            break;
        }
    }

    Ok(result)
}

/// Classify a read against every variant it overlaps.
///
/// When a translator is given the read's chromosome name is translated
/// before the lookup; a name missing from the table fails the whole call.
/// Unmapped reads overlap nothing and are `Ambiguous`.
///
/// # Errors
///
/// Returns `ClassifyError::Translation` for an untranslatable chromosome,
/// `ClassifyError::Variant` if a variant lacks one of the samples, or
/// `ClassifyError::Source` if the variant source fails.
pub fn classify_read<R, S>(
    read: &R,
    source: &S,
    samples: &SamplePair,
    translator: Option<&ChromosomeNameTranslator>,
) -> Result<Classification, ClassifyError>
where
    R: AlignedRead + ?Sized,
    S: VariantSource + ?Sized,
{
    let Some(mut interval) = read.interval() else {
        return Ok(Classification::Ambiguous);
    };

    if let Some(translator) = translator {
        interval.chromosome = translator.translate(&interval.chromosome)?.to_string();
    }

    let variants = source
        .query_overlapping(&interval)
        .map_err(|e| ClassifyError::Source(Box::new(e)))?;

    fold_classifications(variants.map(|variant| -> Result<Classification, ClassifyError> {
        let variant = variant.map_err(|e| ClassifyError::Source(Box::new(e)))?;
        Ok(classify_snp(read, &variant, samples)?)
    }))
}

/// Classifies reads for one run: a fixed pair of samples and an optional
/// chromosome name translation, both set once up front.
#[derive(Debug, Clone)]
pub struct ReadClassifier {
    samples: SamplePair,
    translator: Option<ChromosomeNameTranslator>,
}

impl ReadClassifier {
    #[must_use]
    pub fn new(samples: SamplePair) -> Self {
        Self {
            samples,
            translator: None,
        }
    }

    /// Translate read chromosome names before variant lookups
    #[must_use]
    pub fn with_translator(mut self, translator: ChromosomeNameTranslator) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn samples(&self) -> &SamplePair {
        &self.samples
    }

    #[must_use]
    pub fn translates(&self) -> bool {
        self.translator.is_some()
    }

    /// Classify one read; see [`classify_read`]
    ///
    /// # Errors
    ///
    /// Propagates any error from [`classify_read`].
    pub fn classify_read<R, S>(&self, read: &R, source: &S) -> Result<Classification, ClassifyError>
    where
        R: AlignedRead + ?Sized,
        S: VariantSource + ?Sized,
    {
        classify_read(read, source, &self.samples, self.translator.as_ref())
    }
}

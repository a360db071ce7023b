use tracing::trace;

use crate::classify::{AlignedRead, SamplePair, Variant, VariantError};
use crate::core::types::Classification;

/// Classify a read against a single variant.
///
/// 1. Identical calls for the two genotypes carry no discriminating
///    information: `Ambiguous`.
/// 2. Either call not a simple homozygous diploid SNV call (heterozygous,
///    missing, indel, other ploidy): `Ambiguous`.
/// 3. Otherwise the read's base at the variant position decides: the first
///    genotype's allele gives `Var1`, the second's gives `Var2`, anything else
///    gives `Conflict`.
///
/// The read base is only looked up when both calls are informative.
///
/// # Errors
///
/// Returns `VariantError::MissingSample` if the variant has no call for one
/// of the two samples.
///
/// # Panics
///
/// Panics if both calls are informative and carry the same base, which the
/// identical-call check rules out.
pub fn classify_snp<R, V>(
    read: &R,
    variant: &V,
    samples: &SamplePair,
) -> Result<Classification, VariantError>
where
    R: AlignedRead + ?Sized,
    V: Variant + ?Sized,
{
    let gt1 = variant.genotype_call_for(samples.genotype1())?;
    let gt2 = variant.genotype_call_for(samples.genotype2())?;

    if gt1.same_genotype(gt2) {
        return Ok(Classification::Ambiguous);
    }

    let (Some(base1), Some(base2)) = (gt1.homozygous_base(), gt2.homozygous_base()) else {
        trace!(
            position = variant.position(),
            gt1 = %gt1,
            gt2 = %gt2,
            "Unsupported genotype representation, treating as ambiguous"
        );
        return Ok(Classification::Ambiguous);
    };

    assert_ne!(
        base1, base2,
        "distinct genotype calls {gt1} and {gt2} resolved to the same base"
    );

    let observed = read.base_at_reference_position(variant.position());

    let classification = if observed == base1 {
        Classification::Var1
    } else if observed == base2 {
        Classification::Var2
    } else {
        Classification::Conflict
    };

    Ok(classification)
}

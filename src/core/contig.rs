use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Naming convention used for chromosomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// UCSC style: chr1, chr2, ..., chrX, chrY, chrM
    Ucsc,
    /// NCBI/Ensembl style: 1, 2, ..., X, Y, MT
    Ncbi,
    /// Mixed, or no primary chromosomes present
    Mixed,
}

/// Number of autosomes covered by the translation table
const AUTOSOME_COUNT: u8 = 22;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Chromosome '{name}' not found in the translation table. Only \"chr1\"-to-\"1\" style \
     conversions (and \"chrM\"-to-\"MT\") are supported"
)]
pub struct TranslationError {
    pub name: String,
}

/// Translates chromosome names between the UCSC ("chr1") and NCBI ("1") conventions.
///
/// The table is a fixed bijection covering the autosomes 1-22 and the sex
/// chromosomes X and Y, plus the one irregular pair `chrM` <-> `MT`. Every
/// entry maps in both directions, so `translate` is its own inverse.
#[derive(Debug, Clone)]
pub struct ChromosomeNameTranslator {
    mapping: HashMap<String, String>,
}

impl ChromosomeNameTranslator {
    /// Build the standard UCSC <-> NCBI table
    #[must_use]
    pub fn new() -> Self {
        let mut pairs: Vec<(String, String)> = (1..=AUTOSOME_COUNT)
            .map(|n| n.to_string())
            .chain(["X".to_string(), "Y".to_string()])
            .map(|ncbi| (format!("chr{ncbi}"), ncbi))
            .collect();
        pairs.push(("chrM".to_string(), "MT".to_string()));

        Self::from_pairs(pairs)
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut mapping = HashMap::new();
        for (ucsc, ncbi) in pairs {
            mapping.insert(ncbi.clone(), ucsc.clone());
            mapping.insert(ucsc, ncbi);
        }
        Self { mapping }
    }

    /// Translate a chromosome name to the other naming convention
    ///
    /// # Errors
    ///
    /// Returns `TranslationError` if the name has no counterpart in the table.
    pub fn translate(&self, name: &str) -> Result<&str, TranslationError> {
        self.mapping
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| TranslationError {
                name: name.to_string(),
            })
    }

    /// Number of names (in either convention) the table knows about
    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl Default for ChromosomeNameTranslator {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a name is a primary chromosome (1-22, X, Y) in either convention
#[must_use]
pub fn is_primary_chromosome(name: &str) -> bool {
    let bare = name.strip_prefix("chr").unwrap_or(name);
    matches!(bare, "X" | "Y")
        || bare
            .parse::<u8>()
            .is_ok_and(|n| (1..=AUTOSOME_COUNT).contains(&n) && !bare.starts_with('0'))
}

/// Detect the naming convention used by a set of chromosome names
pub fn detect_naming_convention<'a, I>(names: I) -> NamingConvention
where
    I: IntoIterator<Item = &'a str>,
{
    let mut has_chr_prefix = false;
    let mut has_no_prefix = false;

    for name in names {
        if is_primary_chromosome(name) {
            if name.starts_with("chr") {
                has_chr_prefix = true;
            } else {
                has_no_prefix = true;
            }
        }
    }

    match (has_chr_prefix, has_no_prefix) {
        (true, false) => NamingConvention::Ucsc,
        (false, true) => NamingConvention::Ncbi,
        _ => NamingConvention::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_both_directions() {
        let translator = ChromosomeNameTranslator::new();

        assert_eq!(translator.translate("chr1"), Ok("1"));
        assert_eq!(translator.translate("1"), Ok("chr1"));
        assert_eq!(translator.translate("chr22"), Ok("22"));
        assert_eq!(translator.translate("X"), Ok("chrX"));
        assert_eq!(translator.translate("chrY"), Ok("Y"));
    }

    #[test]
    fn test_translate_mitochondrial_exception() {
        let translator = ChromosomeNameTranslator::new();

        assert_eq!(translator.translate("chrM"), Ok("MT"));
        assert_eq!(translator.translate("MT"), Ok("chrM"));
        // Only the explicit pair is supported
        assert!(translator.translate("M").is_err());
        assert!(translator.translate("chrMT").is_err());
    }

    #[test]
    fn test_translate_unknown_name() {
        let translator = ChromosomeNameTranslator::new();

        let err = translator.translate("chrZZ").unwrap_err();
        assert_eq!(err.name, "chrZZ");
        assert!(err.to_string().contains("chrZZ"));

        assert!(translator.translate("chr23").is_err());
        assert!(translator.translate("chr1_random").is_err());
        assert!(translator.translate("").is_err());
    }

    #[test]
    fn test_table_is_bijective() {
        let translator = ChromosomeNameTranslator::new();

        // 22 autosomes + X + Y + M, each in two conventions
        assert_eq!(translator.len(), 50);

        for name in translator.mapping.keys() {
            let other = translator.translate(name).unwrap();
            assert_ne!(other, name);
            assert_eq!(translator.translate(other).unwrap(), name);
        }
    }

    #[test]
    fn test_is_primary_chromosome() {
        assert!(is_primary_chromosome("chr1"));
        assert!(is_primary_chromosome("1"));
        assert!(is_primary_chromosome("chrX"));
        assert!(is_primary_chromosome("Y"));
        assert!(!is_primary_chromosome("chrM"));
        assert!(!is_primary_chromosome("chr1_random"));
        assert!(!is_primary_chromosome("01"));
        assert!(!is_primary_chromosome("23"));
    }

    #[test]
    fn test_detect_naming_convention() {
        assert_eq!(
            detect_naming_convention(["chr1", "chr2", "chrM"]),
            NamingConvention::Ucsc
        );
        assert_eq!(
            detect_naming_convention(["1", "2", "MT"]),
            NamingConvention::Ncbi
        );
        assert_eq!(
            detect_naming_convention(["chr1", "2"]),
            NamingConvention::Mixed
        );
        assert_eq!(
            detect_naming_convention(["scaffold_1"]),
            NamingConvention::Mixed
        );
    }
}

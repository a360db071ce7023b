//! Routing classified reads to per-category BAM files.
//!
//! Each run writes four BAM files next to each other, all carrying the input
//! header:
//!
//! | Classification | File |
//! |----------------|------|
//! | `Var1`         | `<prefix>.<genotype1>.bam` |
//! | `Var2`         | `<prefix>.<genotype2>.bam` |
//! | `Ambiguous`    | `<prefix>.ambiguous.bam` |
//! | `Conflict`     | `<prefix>.conflicting.bam` |
//!
//! Records are written in the order they are routed.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use noodles::sam::alignment::io::Write as _;
use noodles::sam::alignment::RecordBuf;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::SamplePair;
use crate::core::types::Classification;

/// Reads between progress messages
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Strip a trailing `.bam` or `.sam` (any case) from an input path
#[must_use]
pub fn default_prefix(input: &Path) -> PathBuf {
    let is_alignment = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("bam") || e.eq_ignore_ascii_case("sam"));

    if is_alignment {
        input.with_extension("")
    } else {
        input.to_path_buf()
    }
}

/// The four output paths of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub genotype1: PathBuf,
    pub genotype2: PathBuf,
    pub ambiguous: PathBuf,
    pub conflicting: PathBuf,
}

impl OutputPaths {
    #[must_use]
    pub fn new(prefix: &Path, samples: &SamplePair) -> Self {
        let with_suffix = |suffix: &str| {
            let mut path = OsString::from(prefix.as_os_str());
            path.push(format!(".{suffix}.bam"));
            PathBuf::from(path)
        };

        Self {
            genotype1: with_suffix(samples.genotype1()),
            genotype2: with_suffix(samples.genotype2()),
            ambiguous: with_suffix("ambiguous"),
            conflicting: with_suffix("conflicting"),
        }
    }

    #[must_use]
    pub fn for_classification(&self, classification: Classification) -> &Path {
        match classification {
            Classification::Var1 => &self.genotype1,
            Classification::Var2 => &self.genotype2,
            Classification::Ambiguous => &self.ambiguous,
            Classification::Conflict => &self.conflicting,
        }
    }

    /// Delete whichever of the four files exist
    ///
    /// Failures are logged and otherwise ignored.
    pub fn remove_all(&self) {
        for classification in Classification::ALL {
            let path = self.for_classification(classification);
            match std::fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "Removed output file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove output file"),
            }
        }
    }
}

/// Number of reads per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationCounts {
    pub total: u64,
    pub genotype1: u64,
    pub genotype2: u64,
    pub ambiguous: u64,
    pub conflicting: u64,
}

impl ClassificationCounts {
    /// Count one read, logging progress every [`PROGRESS_INTERVAL`] reads
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Var1 => self.genotype1 += 1,
            Classification::Var2 => self.genotype2 += 1,
            Classification::Ambiguous => self.ambiguous += 1,
            Classification::Conflict => self.conflicting += 1,
        }
        self.total += 1;

        if self.total % PROGRESS_INTERVAL == 0 {
            info!(reads = self.total, "Processing reads");
        }
    }

    #[must_use]
    pub fn get(&self, classification: Classification) -> u64 {
        match classification {
            Classification::Var1 => self.genotype1,
            Classification::Var2 => self.genotype2,
            Classification::Ambiguous => self.ambiguous,
            Classification::Conflict => self.conflicting,
        }
    }

    /// Share of all reads in one category, 0 when nothing was counted
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self, classification: Classification) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.get(classification) as f64 / self.total as f64
        }
    }

    /// Log the final tally, one line per category
    pub fn log_summary(&self, samples: &SamplePair) {
        info!(reads = self.genotype1, genotype = samples.genotype1(), "Reads assigned");
        info!(reads = self.genotype2, genotype = samples.genotype2(), "Reads assigned");
        info!(reads = self.ambiguous, "Reads were ambiguous");
        info!(reads = self.conflicting, "Reads were in conflict");
    }
}

type BamWriter = bam::io::Writer<bgzf::Writer<File>>;

/// Four BAM writers, one per classification
pub struct ReadRouter {
    header: sam::Header,
    writers: [BamWriter; 4],
}

impl ReadRouter {
    /// Create all four output files and write the header to each
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a file cannot be created or written.
    pub fn create(paths: &OutputPaths, header: &sam::Header) -> io::Result<Self> {
        let open = |path: &Path| -> io::Result<BamWriter> {
            let mut writer = File::create(path).map(bam::io::Writer::new)?;
            writer.write_header(header)?;
            Ok(writer)
        };

        Ok(Self {
            header: header.clone(),
            writers: [
                open(&paths.genotype1)?,
                open(&paths.genotype2)?,
                open(&paths.ambiguous)?,
                open(&paths.conflicting)?,
            ],
        })
    }

    /// Write a record to the file for its classification
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the record cannot be written.
    pub fn route(&mut self, classification: Classification, record: &RecordBuf) -> io::Result<()> {
        self.writers[slot(classification)].write_alignment_record(&self.header, record)
    }

    /// Flush every file and write the BGZF end-of-file markers
    ///
    /// # Errors
    ///
    /// Returns an I/O error if any file cannot be finished.
    pub fn finish(mut self) -> io::Result<()> {
        for writer in &mut self.writers {
            writer.finish(&self.header)?;
        }
        Ok(())
    }
}

// Same order as `OutputPaths` fields
const fn slot(classification: Classification) -> usize {
    match classification {
        Classification::Var1 => 0,
        Classification::Var2 => 1,
        Classification::Ambiguous => 2,
        Classification::Conflict => 3,
    }
}

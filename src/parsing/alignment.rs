//! SAM/BAM alignment reading.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use noodles::sam::alignment::RecordBuf;

use crate::classify::AlignedRead;
use crate::core::types::{Base, GenomicInterval};
use crate::parsing::ParseError;

enum Inner {
    Sam(sam::io::Reader<Box<dyn BufRead>>),
    Bam(bam::io::Reader<bgzf::Reader<File>>),
}

/// Sequential reader over the records of a SAM or BAM file
pub struct AlignmentReader {
    inner: Inner,
    header: sam::Header,
}

impl AlignmentReader {
    /// Open an alignment file, choosing the format from its extension
    ///
    /// Files without an extension are read as SAM.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened,
    /// `ParseError::Noodles` if the header cannot be parsed, or
    /// `ParseError::UnsupportedFormat` for other extensions (including CRAM).
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("bam") => {
                let mut reader = File::open(path).map(bam::io::Reader::new)?;
                let header = reader
                    .read_header()
                    .map_err(|e| ParseError::Noodles(e.to_string()))?;

                Ok(Self {
                    inner: Inner::Bam(reader),
                    header,
                })
            }
            Some("sam") | None => {
                let file = File::open(path)?;
                Self::from_sam(Box::new(BufReader::new(file)))
            }
            Some(ext) => Err(ParseError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Read SAM records from text
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Noodles` if the header cannot be parsed.
    pub fn from_sam_text(text: &str) -> Result<Self, ParseError> {
        Self::from_sam(Box::new(Cursor::new(text.as_bytes().to_vec())))
    }

    fn from_sam(inner: Box<dyn BufRead>) -> Result<Self, ParseError> {
        let mut reader = sam::io::Reader::new(inner);
        let header = reader
            .read_header()
            .map_err(|e| ParseError::Noodles(e.to_string()))?;

        Ok(Self {
            inner: Inner::Sam(reader),
            header,
        })
    }

    #[must_use]
    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    /// The next record, or `None` at end of input
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Noodles` if a record cannot be parsed.
    pub fn next_read(&mut self) -> Result<Option<AlignedRecord>, ParseError> {
        let mut record = RecordBuf::default();

        let bytes_read = match &mut self.inner {
            Inner::Sam(reader) => reader.read_record_buf(&self.header, &mut record),
            Inner::Bam(reader) => reader.read_record_buf(&self.header, &mut record),
        }
        .map_err(|e| ParseError::Noodles(e.to_string()))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        Ok(Some(AlignedRecord::new(record, &self.header)))
    }
}

/// An alignment record together with the name of its reference sequence
#[derive(Debug, Clone)]
pub struct AlignedRecord {
    record: RecordBuf,
    reference_name: Option<String>,
}

impl AlignedRecord {
    #[must_use]
    pub fn new(record: RecordBuf, header: &sam::Header) -> Self {
        let reference_name = record
            .reference_sequence_id()
            .and_then(|id| header.reference_sequences().get_index(id))
            .map(|(name, _)| name.to_string());

        Self {
            record,
            reference_name,
        }
    }

    #[must_use]
    pub fn record(&self) -> &RecordBuf {
        &self.record
    }

    /// Read name, or `*` when the record has none
    #[must_use]
    pub fn name(&self) -> String {
        self.record
            .name()
            .map_or_else(|| "*".to_string(), ToString::to_string)
    }

    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        self.reference_name.as_deref()
    }

    fn alignment_start(&self) -> Option<u64> {
        self.record
            .alignment_start()
            .map(|position| usize::from(position) as u64)
    }
}

impl AlignedRead for AlignedRecord {
    /// `None` for unmapped records, including placed unmapped mates and
    /// mapped records without any reference-consuming CIGAR operation
    fn interval(&self) -> Option<GenomicInterval> {
        if self.record.flags().is_unmapped() {
            return None;
        }

        let chromosome = self.reference_name.as_ref()?;
        let start = self.alignment_start()?;
        let span = reference_span(self.record.cigar().as_ref());

        if span == 0 {
            return None;
        }

        Some(GenomicInterval::new(chromosome.clone(), start, start + span - 1))
    }

    fn base_at_reference_position(&self, position: u64) -> Base {
        let Some(start) = self.alignment_start() else {
            return Base::Other;
        };

        read_offset(self.record.cigar().as_ref(), start, position)
            .and_then(|offset| self.record.sequence().as_ref().get(offset))
            .map_or(Base::Other, |&b| Base::from_ascii(b))
    }
}

/// Number of reference bases covered by a CIGAR
#[must_use]
pub fn reference_span(ops: &[Op]) -> u64 {
    ops.iter()
        .filter(|op| consumes_reference(op.kind()))
        .map(|op| op.len() as u64)
        .sum()
}

/// Offset into the read sequence of the base aligned to `position`
///
/// Returns `None` when the position lies before the alignment start, inside a
/// deletion or skip, or past the aligned span.
#[must_use]
pub fn read_offset(ops: &[Op], alignment_start: u64, position: u64) -> Option<usize> {
    if position < alignment_start {
        return None;
    }

    let mut ref_pos = alignment_start;
    let mut read_pos = 0usize;

    for op in ops {
        let len = op.len();
        let block_end = ref_pos + len as u64;

        match op.kind() {
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                if position < block_end {
                    return usize::try_from(position - ref_pos)
                        .ok()
                        .map(|offset| read_pos + offset);
                }
                read_pos += len;
                ref_pos = block_end;
            }
            Kind::Deletion | Kind::Skip => {
                if position < block_end {
                    return None;
                }
                ref_pos = block_end;
            }
            Kind::Insertion | Kind::SoftClip => read_pos += len,
            Kind::HardClip | Kind::Pad => {}
        }
    }

    None
}

fn consumes_reference(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Match | Kind::Deletion | Kind::Skip | Kind::SequenceMatch | Kind::SequenceMismatch
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:1000
r1\t0\tchr1\t100\t60\t2S3M2D2M1I2M\t*\t0\t0\tTTACGTAGCA\t*
r2\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\t*
r3\t4\tchr1\t100\t0\t*\t*\t0\t0\tACGT\t*
";

    fn ops(cigar: &[(Kind, usize)]) -> Vec<Op> {
        cigar.iter().map(|&(kind, len)| Op::new(kind, len)).collect()
    }

    #[test]
    fn test_reference_span() {
        assert_eq!(reference_span(&[]), 0);
        assert_eq!(reference_span(&ops(&[(Kind::Match, 50)])), 50);
        assert_eq!(
            reference_span(&ops(&[
                (Kind::HardClip, 5),
                (Kind::SoftClip, 3),
                (Kind::Match, 10),
                (Kind::Insertion, 2),
                (Kind::Deletion, 4),
                (Kind::Skip, 100),
                (Kind::SequenceMatch, 6),
                (Kind::SequenceMismatch, 1),
            ])),
            121
        );
    }

    #[test]
    fn test_read_offset_ungapped() {
        let cigar = ops(&[(Kind::Match, 5)]);
        assert_eq!(read_offset(&cigar, 100, 99), None);
        assert_eq!(read_offset(&cigar, 100, 100), Some(0));
        assert_eq!(read_offset(&cigar, 100, 104), Some(4));
        assert_eq!(read_offset(&cigar, 100, 105), None);
    }

    #[test]
    fn test_read_offset_through_gaps() {
        // 2S 3M 2D 2M 1I 2M at 100: M covers 100-102, D 103-104, M 105-106, M 107-108
        let cigar = ops(&[
            (Kind::SoftClip, 2),
            (Kind::Match, 3),
            (Kind::Deletion, 2),
            (Kind::Match, 2),
            (Kind::Insertion, 1),
            (Kind::Match, 2),
        ]);

        assert_eq!(read_offset(&cigar, 100, 100), Some(2));
        assert_eq!(read_offset(&cigar, 100, 102), Some(4));
        assert_eq!(read_offset(&cigar, 100, 103), None);
        assert_eq!(read_offset(&cigar, 100, 104), None);
        assert_eq!(read_offset(&cigar, 100, 105), Some(5));
        assert_eq!(read_offset(&cigar, 100, 106), Some(6));
        assert_eq!(read_offset(&cigar, 100, 107), Some(8));
        assert_eq!(read_offset(&cigar, 100, 108), Some(9));
        assert_eq!(read_offset(&cigar, 100, 109), None);
    }

    #[test]
    fn test_read_offset_skip_and_hard_clip() {
        let cigar = ops(&[
            (Kind::HardClip, 10),
            (Kind::Match, 2),
            (Kind::Skip, 1000),
            (Kind::Match, 2),
        ]);

        assert_eq!(read_offset(&cigar, 1, 2), Some(1));
        assert_eq!(read_offset(&cigar, 1, 500), None);
        assert_eq!(read_offset(&cigar, 1, 1003), Some(2));
        assert_eq!(read_offset(&cigar, 1, 1004), Some(3));
    }

    #[test]
    fn test_reader_yields_records_in_order() {
        let mut reader = AlignmentReader::from_sam_text(SAM).unwrap();
        assert_eq!(reader.header().reference_sequences().len(), 1);

        let mut names = Vec::new();
        while let Some(read) = reader.next_read().unwrap() {
            names.push(read.name());
        }
        assert_eq!(names, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_mapped_record_interval_and_bases() {
        let mut reader = AlignmentReader::from_sam_text(SAM).unwrap();
        let read = reader.next_read().unwrap().unwrap();

        assert_eq!(read.reference_name(), Some("chr1"));
        assert_eq!(read.interval(), Some(GenomicInterval::new("chr1", 100, 108)));

        assert_eq!(read.base_at_reference_position(99), Base::Other);
        assert_eq!(read.base_at_reference_position(100), Base::A);
        assert_eq!(read.base_at_reference_position(102), Base::G);
        assert_eq!(read.base_at_reference_position(103), Base::Other);
        assert_eq!(read.base_at_reference_position(105), Base::T);
        assert_eq!(read.base_at_reference_position(107), Base::C);
        assert_eq!(read.base_at_reference_position(108), Base::A);
        assert_eq!(read.base_at_reference_position(109), Base::Other);
    }

    #[test]
    fn test_unmapped_records_have_no_interval() {
        let mut reader = AlignmentReader::from_sam_text(SAM).unwrap();
        reader.next_read().unwrap();

        let unplaced = reader.next_read().unwrap().unwrap();
        assert_eq!(unplaced.reference_name(), None);
        assert_eq!(unplaced.interval(), None);

        // Placed on chr1 next to its mate but flagged unmapped
        let placed = reader.next_read().unwrap().unwrap();
        assert_eq!(placed.reference_name(), Some("chr1"));
        assert_eq!(placed.interval(), None);

        assert!(reader.next_read().unwrap().is_none());
    }

    #[test]
    fn test_site_inside_skip_conflicts() {
        use crate::classify::{ReadClassifier, SamplePair};
        use crate::core::types::Classification;
        use crate::parsing::vcf::VariantIndex;

        let sam = "@HD\tVN:1.6
@SQ\tSN:chr1\tLN:1000
spliced\t0\tchr1\t100\t60\t1M99N1M\t*\t0\t0\tAT\t*
";
        let vcf = "##fileformat=VCFv4.3
##contig=<ID=chr1,length=1000>
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tB6\tCAST
chr1\t100\t.\tA\tG\t.\tPASS\t.\tGT\t0/0\t1/1
chr1\t150\t.\tC\tT\t.\tPASS\t.\tGT\t0/0\t1/1
";
        let samples = SamplePair::new("B6", "CAST").unwrap();
        let index = VariantIndex::from_vcf_text(vcf, &samples).unwrap();

        let mut reader = AlignmentReader::from_sam_text(sam).unwrap();
        let read = reader.next_read().unwrap().unwrap();

        assert_eq!(read.interval(), Some(GenomicInterval::new("chr1", 100, 200)));
        assert_eq!(read.base_at_reference_position(100), Base::A);
        assert_eq!(read.base_at_reference_position(150), Base::Other);
        assert_eq!(read.base_at_reference_position(200), Base::T);

        // 100 alone would call B6; the intron site at 150 overrides it
        let classifier = ReadClassifier::new(samples);
        assert_eq!(
            classifier.classify_read(&read, &index).unwrap(),
            Classification::Conflict
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = AlignmentReader::from_path(Path::new("reads.cram"))
            .err()
            .unwrap();
        assert!(matches!(err, ParseError::UnsupportedFormat(ref ext) if ext == "cram"));
    }
}

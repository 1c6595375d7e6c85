/*! Reader for GFF3 files with an embedded assembly.

Annotation pipelines such as Prokka append the annotated assembly to their GFF3 output, after a
`##FASTA` directive line. This module reads the annotation records that precede the directive and
copies the sequences that follow it into a separate FASTA file.

Parsing of the annotation rows is done by the GFF reader of the
[rust-bio](https://github.com/rust-bio/rust-bio) library.
*/
use std::cmp::min;
use std::convert::AsRef;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bio::io::gff::{self, GffType};
use bio_types::strand::Strand as BioStrand;
use csv;

use consts::FASTA_DIRECTIVE;
use model::{Feature, Strand};


quick_error! {
    /// Errors that occur when reading GFF files.
    #[derive(Debug)]
    pub enum GffError {
        /// Occurs when a row of the annotation section can not be parsed.
        InvalidRow(err: csv::Error) {
            description("invalid annotation row")
            display("invalid annotation row: {}", err)
            from()
            cause(err)
        }
        /// Occurs when the annotation file can not be read.
        Unreadable(path: String, err: io::Error) {
            description("can not read annotation file")
            display("can not read annotation file {}: {}", path, err)
            cause(err)
        }
    }
}

/// Returns whether the line is the directive that starts the embedded assembly.
#[inline]
fn is_fasta_directive(line: &[u8]) -> bool {
    line.starts_with(FASTA_DIRECTIVE.as_bytes())
}

/// Reader adapter that ends at the `##FASTA` directive.
///
/// The underlying reader is consumed line by line so that no sequence data is handed to the
/// annotation parser.
pub struct AnnotationSection<R: BufRead> {
    inner: R,
    line: Vec<u8>,
    pos: usize,
    done: bool,
}

impl<R: BufRead> AnnotationSection<R> {

    fn new(inner: R) -> AnnotationSection<R> {
        AnnotationSection { inner: inner, line: Vec::new(), pos: 0, done: false }
    }
}

impl<R: BufRead> Read for AnnotationSection<R> {

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.line.len() {
            if self.done {
                return Ok(0);
            }
            self.line.clear();
            self.pos = 0;
            let n = self.inner.read_until(b'\n', &mut self.line)?;
            if n == 0 || is_fasta_directive(&self.line) {
                self.line.clear();
                self.done = true;
                return Ok(0);
            }
        }
        let n = min(buf.len(), self.line.len() - self.pos);
        buf[..n].copy_from_slice(&self.line[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// GFF3 reader.
pub struct Reader<R: BufRead> {
    inner: gff::Reader<AnnotationSection<R>>,
}

impl<R: BufRead> Reader<R> {

    /// Creates a GFF3 reader from another reader.
    pub fn from_reader(in_reader: R) -> Reader<R> {
        Reader {
            inner: gff::Reader::new(AnnotationSection::new(in_reader), GffType::GFF3),
        }
    }

    /// Creates an iterator over the annotation records.
    ///
    /// Rows that fail to parse are yielded as errors, so that callers can decide whether to skip
    /// them.
    pub fn features(&mut self) -> GffFeatures<R> {
        GffFeatures { inner: self.inner.records() }
    }
}

impl Reader<BufReader<fs::File>> {

    /// Creates a GFF3 reader that reads from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GffError> {
        open(path.as_ref()).map(|file| Reader::from_reader(BufReader::new(file)))
    }
}

/// Iterator over annotation records.
pub struct GffFeatures<'a, R: 'a> where R: BufRead {
    inner: gff::Records<'a, AnnotationSection<R>>,
}

impl<'a, R> Iterator for GffFeatures<'a, R> where R: BufRead {

    type Item = Result<Feature, GffError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
            .map(|rec| rec.map(feature_from_record).map_err(GffError::from))
    }
}

/// Converts a rust-bio GFF record.
fn feature_from_record(record: gff::Record) -> Feature {
    let strand = match record.strand() {
        Some(BioStrand::Reverse) => Strand::Reverse,
        _ => Strand::Forward,
    };
    record.attributes().iter()
        .fold(Feature::new(record.seqname(), *record.start(), *record.end(), strand,
                           record.feature_type()),
              |fx, (key, value)| fx.with_attribute(key.as_str(), value.as_str()))
}

/// Opens the annotation file.
fn open(path: &Path) -> Result<fs::File, GffError> {
    fs::File::open(path)
        .map_err(|e| GffError::Unreadable(path.display().to_string(), e))
}

/// Copies the sequences following the `##FASTA` directive into their own file.
///
/// The directive line itself is not copied. When the annotation file has no directive, the
/// output is created empty. Returns whether the directive was found.
pub fn write_embedded_assembly<P, Q>(gff_path: P, fasta_path: Q) -> ::Result<bool>
    where P: AsRef<Path>, Q: AsRef<Path>
{
    let mut reader = BufReader::new(open(gff_path.as_ref())?);
    let mut writer = BufWriter::new(fs::File::create(fasta_path)?);

    let mut found = false;
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if found {
            writer.write_all(&line)?;
        } else if is_fasta_directive(&line) {
            found = true;
        }
    }
    writer.flush()?;

    Ok(found)
}

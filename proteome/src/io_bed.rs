/*! Reader and writer for the BED format.

BED is the interval format understood by the extraction tools. Each region is written as a BED6
row: sequence name, zero-based start, end, name, score, and strand.

A description of the columns can be found on
[this page](https://genome.ucsc.edu/FAQ/FAQformat.html#format1).
*/
use std::convert::AsRef;
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::Path;

use csv;

use model::{Region, Strand};


quick_error! {
    /// Errors that occur when reading or writing BED files.
    #[derive(Debug)]
    pub enum BedError {
        /// Occurs when a row has fewer than the three required columns.
        MissingColumns(line: u64) {
            description("BED row has fewer than three columns")
            display("BED row has fewer than three columns, line: {}", line)
        }
        /// Occurs when a start or end column is not a valid u64 value.
        InvalidCoord(err: ParseIntError, line: u64) {
            description("invalid BED coordinate")
            display("invalid BED coordinate, line {}: {}", line, err)
            cause(err)
        }
        /// Occurs when the end coordinate is smaller than the start coordinate.
        InvalidInterval(line: u64) {
            description("BED end coordinate is smaller than its start")
            display("BED end coordinate is smaller than its start, line: {}", line)
        }
        /// Errors propagated from the underlying `csv` crate.
        Csv(err: csv::Error) {
            description("malformed BED file")
            display("malformed BED file: {}", err)
            from()
            cause(err)
        }
    }
}

/// BED writer.
pub struct Writer<W: io::Write> {
    inner: csv::Writer<W>,
}

impl<W: io::Write> Writer<W> {

    /// Creates a BED writer from another writer.
    pub fn from_writer(in_writer: W) -> Writer<W> {
        Writer {
            inner: csv::WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .quote_style(csv::QuoteStyle::Never)
                .from_writer(in_writer),
        }
    }

    /// Writes the given region as a single row.
    pub fn write_region(&mut self, region: &Region) -> ::Result<()> {
        self.inner
            .serialize((region.seq_name(), region.start(), region.end(), region.name(),
                        region.score(), region.strand().symbol()))
            .map_err(|e| ::Error::from(BedError::from(e)))
    }

    /// Writes all the given regions and flushes the writer.
    pub fn write_regions<'a, I>(&mut self, regions: I) -> ::Result<usize>
        where I: IntoIterator<Item = &'a Region>
    {
        let mut n = 0;
        for region in regions {
            self.write_region(region)?;
            n += 1;
        }
        self.flush()?;
        Ok(n)
    }

    /// Flushes buffered rows to the underlying writer.
    pub fn flush(&mut self) -> ::Result<()> {
        self.inner.flush().map_err(::Error::from)
    }
}

impl Writer<fs::File> {

    /// Creates a BED writer that writes to the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let f = fs::File::create(path)?;
        Ok(Writer::from_writer(f))
    }
}

impl Writer<Vec<u8>> {

    /// Creates a BED writer that writes to an in-memory buffer.
    pub fn from_memory() -> Writer<Vec<u8>> {
        Writer::from_writer(Vec::with_capacity(1024 * 64))
    }

    /// Consumes the writer and returns the written rows as a string.
    pub fn into_string(self) -> ::Result<String> {
        let buf = self.inner.into_inner()
            .map_err(|e| ::Error::from(io::Error::new(io::ErrorKind::Other, e.to_string())))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// BED reader.
///
/// Rows need at least three columns. Rows without a name column are named
/// `<sequence>:<start>-<end>`; rows without a strand column are read as forward.
pub struct Reader<R: io::Read> {
    inner: csv::Reader<R>,
}

impl<R: io::Read> Reader<R> {

    /// Creates a BED reader from another reader.
    pub fn from_reader(in_reader: R) -> Reader<R> {
        Reader {
            inner: csv::ReaderBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .flexible(true)
                .comment(Some(b'#'))
                .quoting(false)
                .from_reader(in_reader),
        }
    }

    /// Creates an iterator over the regions.
    pub fn regions(&mut self) -> BedRegions<R> {
        BedRegions { inner: self.inner.records() }
    }
}

impl Reader<fs::File> {

    /// Creates a BED reader that reads from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        fs::File::open(path).map(Reader::from_reader)
    }
}

/// Iterator over BED regions.
pub struct BedRegions<'a, R: 'a> where R: io::Read {
    inner: csv::StringRecordsIter<'a, R>,
}

impl<'a, R> Iterator for BedRegions<'a, R> where R: io::Read {

    type Item = ::Result<Region>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
            .map(|result| {
                result.map_err(|e| ::Error::from(BedError::from(e)))
                    .and_then(|rec| region_from_record(&rec).map_err(::Error::from))
            })
    }
}

/// Creates a region from a raw BED row.
fn region_from_record(rec: &csv::StringRecord) -> Result<Region, BedError> {
    let line = rec.position().map(|p| p.line()).unwrap_or(0);
    if rec.len() < 3 {
        return Err(BedError::MissingColumns(line));
    }
    let parse_coord = |raw: &str| raw.trim().parse::<u64>()
        .map_err(|e| BedError::InvalidCoord(e, line));
    let start = parse_coord(&rec[1])?;
    let end = parse_coord(&rec[2])?;
    let name = match rec.get(3) {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => format!("{}:{}-{}", &rec[0], start, end),
    };
    let strand = rec.get(5)
        .and_then(|v| v.chars().next())
        .map(Strand::from_symbol)
        .unwrap_or(Strand::Forward);

    Region::new(&rec[0], start, end, name, strand)
        .ok_or(BedError::InvalidInterval(line))
}

/*! Extraction of protein sequences from annotated genome assemblies.

The input is a GFF3 file that carries its nucleotide assembly after a `##FASTA` directive. Coding
and RNA features are selected from the annotation, exported as BED intervals, extracted from the
embedded assembly, translated, and finally filtered by their content of unknown residues.

The entry point is [`Pipeline`], which runs every stage once inside a private working directory:

```no_run
use proteome::{Config, Native, Pipeline};

let mut pipeline = Pipeline::new("genome.gff", Config::default(), Native::new())?;
let proteins = pipeline.output()?.to_path_buf();
# Ok::<(), proteome::Error>(())
```
*/
#![deny(
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unused_results)]

extern crate bio;
extern crate bio_types;
extern crate csv;
extern crate itertools;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;
extern crate regex;
extern crate tempfile;
extern crate which;

use std::io::Error as IoError;

use csv::Error as CsvError;
use regex::Error as RegexError;

mod config;
pub use config::{Config, ConfigError};

mod model;
pub use model::{Feature, Protein, Region, Strand};

mod io_gff;
pub use io_gff::{Reader as GffReader, GffError, GffFeatures, write_embedded_assembly};

mod select;
pub use select::Selector;

mod io_bed;
pub use io_bed::{Reader as BedReader, Writer as BedWriter, BedError};

mod extract;
pub use extract::{Bedtools, Extraction, ExtractError, Extractor, Native};

mod translate;
pub use translate::{GeneticCode, translate_file, strip_header_quotes};

mod filter;
pub use filter::{Filter, filter_file};

mod pipeline;
pub use pipeline::{Pipeline, Summary};


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Config(err: ConfigError) {
            description("invalid configuration")
            display("{}", err)
            from()
            cause(err)
        }
        Gff(err: GffError) {
            description("annotation error")
            display("{}", err)
            from()
            cause(err)
        }
        Bed(err: BedError) {
            description("interval error")
            display("{}", err)
            from()
            cause(err)
        }
        Extract(err: ExtractError) {
            description("extraction error")
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: IoError) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
            cause(err)
        }
        Regex(err: RegexError) {
            description("invalid pattern")
            display("{}", err)
            from()
            cause(err)
        }
        Csv(err: CsvError) {
            description("delimited file error")
            display("{}", err)
            from()
            cause(err)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

// Crate-wide constants
mod consts {
    // Directive separating the annotation section from the embedded assembly.
    pub(crate) const FASTA_DIRECTIVE: &'static str = "##FASTA";

    // Symbol for residues that can not be resolved from their codon.
    pub(crate) const UNKNOWN_RESIDUE: u8 = b'X';

    // Symbol used by genetic-code tables for stop codons.
    pub(crate) const STOP_RESIDUE: u8 = b'*';

    // BED score column value; the extraction does not use it.
    pub(crate) const BED_SCORE: u32 = 1;

    // Characters removed from identifiers and protein headers.
    pub(crate) const QUOTE_CHARS: &'static [char] = &['"', '\''];

    // Extension of the final protein file.
    pub(crate) const PROTEIN_EXT: &'static str = "faa";
}

// Generic utilities
mod utils {
    use std::fs;
    use std::io;
    use std::path::Path;

    use consts::QUOTE_CHARS;

    /// Returns the given identifier without any quote characters.
    #[inline]
    pub(crate) fn strip_quotes(value: &str) -> String {
        value.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect()
    }

    /// Removes a transient file, ignoring files that were never created.
    pub(crate) fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<()> {
        match fs::remove_file(path.as_ref()) {
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

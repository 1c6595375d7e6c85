/*! Extraction of region sequences from a nucleotide reference.

The pipeline does not extract sequences itself. It prepares a reference FASTA and a BED file and
hands both to an [`Extractor`]. Two are provided:

* [`Bedtools`] runs `bedtools getfasta` as a child process.
* [`Native`] does the same in-process, for systems without bedtools.
*/
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use bio::alphabets::dna;
use bio::io::fasta;
use itertools::Itertools;
use which;

use io_bed::Reader as BedReader;
use model::{Region, Strand};


/// Name of the bedtools executable.
const BEDTOOLS_BIN: &'static str = "bedtools";

quick_error! {
    /// Errors that occur when running an extraction.
    #[derive(Debug)]
    pub enum ExtractError {
        /// Occurs when the extraction program can not be started.
        Spawn(program: String, err: io::Error) {
            description("can not start extraction program")
            display("can not start {}: {}", program, err)
            cause(err)
        }
        /// Occurs when the extraction program exits unsuccessfully.
        Failed(program: String, status: String, stderr: String) {
            description("extraction program failed")
            display("{} failed ({}): {}", program, status, stderr.trim())
        }
    }
}

/// Paths and flags of a single extraction run.
#[derive(Debug, Clone, Copy)]
pub struct Extraction<'a> {
    /// Nucleotide FASTA to extract from.
    pub reference: &'a Path,
    /// BED file of the regions to extract.
    pub regions: &'a Path,
    /// FASTA file receiving one record per extracted region.
    pub output: &'a Path,
    /// Whether reverse strand regions are reverse complemented.
    pub stranded: bool,
    /// Whether records are named after the BED name column instead of their coordinates.
    pub named: bool,
}

/// A service that writes the sequences of BED regions to a FASTA file.
pub trait Extractor {

    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Whether record names carry coordinate or strand decorations after the region name.
    fn decorates_names(&self) -> bool {
        false
    }

    /// Runs the extraction.
    ///
    /// Regions that can not be extracted are left out of the output rather than reported as
    /// errors.
    fn extract(&self, job: &Extraction) -> ::Result<()>;
}

impl<'e, E: Extractor + ?Sized> Extractor for &'e E {

    fn name(&self) -> &str {
        (**self).name()
    }

    fn decorates_names(&self) -> bool {
        (**self).decorates_names()
    }

    fn extract(&self, job: &Extraction) -> ::Result<()> {
        (**self).extract(job)
    }
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {

    fn name(&self) -> &str {
        (**self).name()
    }

    fn decorates_names(&self) -> bool {
        (**self).decorates_names()
    }

    fn extract(&self, job: &Extraction) -> ::Result<()> {
        (**self).extract(job)
    }
}

/// Extractor backed by `bedtools getfasta`.
#[derive(Debug, Clone)]
pub struct Bedtools {
    program: PathBuf,
}

impl Bedtools {

    /// Creates an extractor that runs the given bedtools executable.
    pub fn new<P: Into<PathBuf>>(program: P) -> Bedtools {
        Bedtools { program: program.into() }
    }

    /// Creates an extractor for the bedtools executable found on `PATH`, if any.
    pub fn locate() -> Option<Bedtools> {
        which::which(BEDTOOLS_BIN).ok().map(Bedtools::new)
    }

    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Returns the arguments of the `getfasta` invocation.
    fn args<'a>(&self, job: &Extraction<'a>) -> Vec<&'a OsStr> {
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("getfasta"),
            OsStr::new("-fi"), job.reference.as_os_str(),
            OsStr::new("-bed"), job.regions.as_os_str(),
            OsStr::new("-fo"), job.output.as_os_str(),
        ];
        if job.stranded {
            args.push(OsStr::new("-s"));
        }
        if job.named {
            args.push(OsStr::new("-name"));
        }
        args
    }
}

impl Extractor for Bedtools {

    fn name(&self) -> &str {
        BEDTOOLS_BIN
    }

    fn decorates_names(&self) -> bool {
        true
    }

    fn extract(&self, job: &Extraction) -> ::Result<()> {
        let args = self.args(job);
        debug!("running {} {}", self.program.display(),
               args.iter().map(|a| a.to_string_lossy()).join(" "));

        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| ExtractError::Spawn(program.clone(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(ExtractError::Failed(program, output.status.to_string(), stderr).into());
        }
        Ok(())
    }
}

/// In-process extractor.
///
/// The whole reference is held in memory, which suits the bacterial-sized assemblies that are
/// embedded in annotation files. Records are written unwrapped, named like bedtools does.
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

impl Native {

    pub fn new() -> Native {
        Native
    }
}

impl Extractor for Native {

    fn name(&self) -> &str {
        "native"
    }

    fn extract(&self, job: &Extraction) -> ::Result<()> {
        let reference = load_reference(job.reference)?;
        let mut reader = BedReader::from_file(job.regions)?;
        let mut writer = fasta::Writer::new(fs::File::create(job.output)?);

        for result in reader.regions() {
            let region = result?;
            let seq = match reference.get(region.seq_name()) {
                Some(seq) => seq,
                None => {
                    warn!("sequence '{}' of region '{}' not found in reference, skipping",
                          region.seq_name(), region.name());
                    continue;
                },
            };
            if region.end() > seq.len() as u64 {
                warn!("region '{}' ends at {} beyond sequence '{}' of length {}, skipping",
                      region.name(), region.end(), region.seq_name(), seq.len());
                continue;
            }
            let sub = &seq[region.start() as usize..region.end() as usize];
            let oriented = match region.strand() {
                Strand::Reverse if job.stranded => dna::revcomp(sub),
                _ => sub.to_vec(),
            };
            writer.write(&record_name(&region, job.named), None, &oriented)?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Returns the output record name of a region.
fn record_name(region: &Region, named: bool) -> String {
    if named {
        region.name().to_owned()
    } else {
        format!("{}:{}-{}", region.seq_name(), region.start(), region.end())
    }
}

/// Reads all reference sequences into memory, keyed by their identifiers.
fn load_reference(path: &Path) -> ::Result<HashMap<String, Vec<u8>>> {
    let reader = fasta::Reader::new(fs::File::open(path)?);
    let mut sequences = HashMap::new();
    for result in reader.records() {
        let record = result?;
        let _ = sequences.insert(record.id().to_owned(), record.seq().to_vec());
    }
    Ok(sequences)
}

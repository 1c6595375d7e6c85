//! Removal of proteins with too many unknown residues.
use std::convert::AsRef;
use std::fs;
use std::path::Path;

use bio::io::fasta;

use config::Config;
use model::Protein;


/// Unknown residue filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    max_unknowns_percentage: f64,
}

impl Filter {

    /// Creates a filter that allows at most the given percentage of unknown residues.
    pub fn new(max_unknowns_percentage: f64) -> Filter {
        Filter { max_unknowns_percentage: max_unknowns_percentage }
    }

    /// Creates a filter with the threshold of the given config.
    pub fn from_config(config: &Config) -> Filter {
        Filter::new(config.max_unknowns_percentage())
    }

    /// Returns the number of unknown residues allowed in a protein of the given length.
    ///
    /// The allowance is rounded down, so proteins shorter than `100 / percentage` residues
    /// may not contain any unknown residue.
    #[inline]
    pub fn max_unknowns(&self, len: usize) -> usize {
        (len as f64 * self.max_unknowns_percentage / 100.0).floor() as usize
    }

    /// Returns whether the protein is retained.
    pub fn accepts(&self, protein: &Protein) -> bool {
        protein.unknown_count() <= self.max_unknowns(protein.len())
    }
}

/// Filters the proteins of a FASTA file.
///
/// Retained proteins are first written without descriptions to `tmp`, which then replaces
/// `output`. A missing input is read as an empty file, so `output` always exists afterwards.
/// Returns the number of read and retained proteins.
pub fn filter_file<P, Q, R>(input: P, tmp: Q, output: R, filter: &Filter)
    -> ::Result<(usize, usize)>
    where P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>
{
    let input = input.as_ref();
    let tmp = tmp.as_ref();
    let mut writer = fasta::Writer::new(fs::File::create(tmp)?);

    let (mut n_read, mut n_kept) = (0, 0);
    if input.exists() {
        let reader = fasta::Reader::new(fs::File::open(input)?);
        for result in reader.records() {
            let record = result?;
            n_read += 1;
            let protein = Protein::new(record.id(), record.seq().to_vec());
            if filter.accepts(&protein) {
                writer.write(protein.id(), None, protein.residues())?;
                n_kept += 1;
            } else {
                debug!("discarding '{}': {} of {} residues unknown",
                       protein.id(), protein.unknown_count(), protein.len());
            }
        }
    }
    writer.flush()?;
    drop(writer);
    fs::rename(tmp, output.as_ref())?;

    Ok((n_read, n_kept))
}

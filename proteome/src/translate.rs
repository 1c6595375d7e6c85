/*! Translation of nucleotide sequences into proteins.

Genetic codes are the NCBI translation tables, indexed by their NCBI identifiers. Each table is
stored as the 64 residues of its codons in `TCAG` order, i.e. `TTT`, `TTC`, `TTA`, `TTG`,
`TCT`, ... `GGG`, as listed in the NCBI `gc.prt` file.
*/
use std::convert::AsRef;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bio::io::fasta;
use regex::Regex;

use consts::{STOP_RESIDUE, UNKNOWN_RESIDUE};
use utils::strip_quotes;


/// NCBI genetic-code tables: identifier, name, and residues in `TCAG` codon order.
const TABLES: &'static [(u8, &'static str, &'static [u8; 64])] = &[
    (1, "Standard",
     b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (2, "Vertebrate Mitochondrial",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG"),
    (3, "Yeast Mitochondrial",
     b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (4, "Mold, Protozoan, and Coelenterate Mitochondrial; Mycoplasma; Spiroplasma",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (5, "Invertebrate Mitochondrial",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG"),
    (6, "Ciliate, Dasycladacean and Hexamita Nuclear",
     b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (9, "Echinoderm and Flatworm Mitochondrial",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
    (10, "Euplotid Nuclear",
     b"FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (11, "Bacterial, Archaeal and Plant Plastid",
     b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (12, "Alternative Yeast Nuclear",
     b"FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (13, "Ascidian Mitochondrial",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG"),
    (14, "Alternative Flatworm Mitochondrial",
     b"FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
    (16, "Chlorophycean Mitochondrial",
     b"FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (21, "Trematode Mitochondrial",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
    (22, "Scenedesmus obliquus Mitochondrial",
     b"FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (23, "Thraustochytrium Mitochondrial",
     b"FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
    (24, "Rhabdopleuridae Mitochondrial",
     b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
    (25, "Candidate Division SR1 and Gracilibacteria",
     b"FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
];

/// Returns the `TCAG` indices of the bases denoted by a nucleotide symbol.
///
/// IUPAC ambiguity codes expand to all the bases they denote.
#[inline]
fn expand(symbol: u8) -> Option<&'static [usize]> {
    let bases: &'static [usize] = match symbol.to_ascii_uppercase() {
        b'T' | b'U' => &[0],
        b'C' => &[1],
        b'A' => &[2],
        b'G' => &[3],
        b'Y' => &[0, 1],
        b'W' => &[0, 2],
        b'K' => &[0, 3],
        b'M' => &[1, 2],
        b'S' => &[1, 3],
        b'R' => &[2, 3],
        b'H' => &[0, 1, 2],
        b'B' => &[0, 1, 3],
        b'D' => &[0, 2, 3],
        b'V' => &[1, 2, 3],
        b'N' => &[0, 1, 2, 3],
        _ => return None,
    };
    Some(bases)
}

/// An NCBI genetic code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticCode {
    id: u8,
    name: &'static str,
    residues: &'static [u8; 64],
}

impl GeneticCode {

    /// Returns the genetic code with the given NCBI identifier.
    pub fn from_id(id: u8) -> Option<GeneticCode> {
        TABLES.iter()
            .find(|t| t.0 == id)
            .map(|&(id, name, residues)| GeneticCode { id: id, name: name, residues: residues })
    }

    /// Returns all supported genetic codes, ordered by identifier.
    pub fn all() -> Vec<GeneticCode> {
        TABLES.iter()
            .map(|&(id, name, residues)| GeneticCode { id: id, name: name, residues: residues })
            .collect()
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Translates a single codon.
    ///
    /// Ambiguous codons translate to the residue shared by all the codons they denote, or to
    /// `X` when those differ. Codons with symbols that are not nucleotides translate to `X`.
    pub fn residue(&self, codon: &[u8]) -> u8 {
        if codon.len() != 3 {
            return UNKNOWN_RESIDUE;
        }
        let (first, second, third) = match (expand(codon[0]), expand(codon[1]),
                                            expand(codon[2])) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => return UNKNOWN_RESIDUE,
        };

        let mut shared = None;
        for &i in first {
            for &j in second {
                for &k in third {
                    let residue = self.residues[i * 16 + j * 4 + k];
                    match shared {
                        None => shared = Some(residue),
                        Some(r) if r != residue => return UNKNOWN_RESIDUE,
                        _ => {},
                    }
                }
            }
        }
        shared.unwrap_or(UNKNOWN_RESIDUE)
    }

    /// Translates a sequence from its first base.
    ///
    /// Translation ends at the first stop codon, which is not included. A trailing partial
    /// codon is ignored.
    pub fn translate(&self, seq: &[u8]) -> Vec<u8> {
        let mut protein = Vec::with_capacity(seq.len() / 3);
        for codon in seq.chunks_exact(3) {
            let residue = self.residue(codon);
            if residue == STOP_RESIDUE {
                break;
            }
            protein.push(residue);
        }
        protein
    }
}

/// Pattern of the decorations bedtools adds to region names.
///
/// Depending on its version, bedtools writes names as `name::seq:start-end(strand)` or
/// `name(strand)`.
const DECORATION_PATTERN: &'static str =
    r"^(?P<name>.*?)(?:::[^:]+:\d+-\d+)?(?:\([+.-]\))?$";

/// Returns the region name carried by a decorated record identifier.
fn region_name<'a>(decoration: &Regex, record_id: &'a str) -> &'a str {
    decoration.captures(record_id)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
        .unwrap_or(record_id)
}

/// Translates every record of a nucleotide FASTA file.
///
/// Output records are named after their regions and carry no description. When `decorated` is
/// set, the coordinate and strand decorations of bedtools are removed from the record names.
/// Returns the number of read and translated records. A missing input file is treated as
/// holding no records, in which case no output is written.
pub fn translate_file<P, Q>(input: P, output: Q, code: &GeneticCode, decorated: bool)
    -> ::Result<(usize, usize)>
    where P: AsRef<Path>, Q: AsRef<Path>
{
    let input = input.as_ref();
    if !input.exists() {
        warn!("no extracted sequences found at {}", input.display());
        return Ok((0, 0));
    }

    let decoration = if decorated { Some(Regex::new(DECORATION_PATTERN)?) } else { None };
    let reader = fasta::Reader::new(fs::File::open(input)?);
    let mut writer = fasta::Writer::new(fs::File::create(output)?);

    let (mut n_read, mut n) = (0, 0);
    for result in reader.records() {
        let record = result?;
        n_read += 1;
        let name = match decoration {
            Some(ref re) => region_name(re, record.id()),
            None => record.id(),
        };
        if name.is_empty() {
            warn!("skipping extracted sequence without a name");
            continue;
        }
        writer.write(name, None, &code.translate(record.seq()))?;
        n += 1;
    }
    writer.flush()?;

    debug!("translated {} of {} sequences with table {} ({})",
           n, n_read, code.id(), code.name());
    Ok((n_read, n))
}

/// Copies a FASTA file, removing quote characters from its header lines.
///
/// Returns `false` without writing anything when the input does not exist.
pub fn strip_header_quotes<P, Q>(input: P, output: Q) -> ::Result<bool>
    where P: AsRef<Path>, Q: AsRef<Path>
{
    let input = input.as_ref();
    if !input.exists() {
        return Ok(false);
    }

    let reader = BufReader::new(fs::File::open(input)?);
    let mut writer = BufWriter::new(fs::File::create(output)?);
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('>') {
            writeln!(writer, "{}", strip_quotes(&line))?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }
    writer.flush()?;

    Ok(true)
}

//! Records passed between the extraction stages.
use std::collections::HashMap;
use std::fmt;

use bio::utils::Interval;

use consts::{BED_SCORE, UNKNOWN_RESIDUE};


/// Orientation of a feature relative to the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {

    /// Returns the strand as its BED column symbol.
    pub fn symbol(&self) -> char {
        match *self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }

    /// Parses a strand column value.
    ///
    /// Anything other than `-` reads as forward, which is how unstranded rows are extracted.
    pub fn from_symbol(symbol: char) -> Strand {
        match symbol {
            '-' => Strand::Reverse,
            _ => Strand::Forward,
        }
    }
}

impl fmt::Display for Strand {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single annotation record.
///
/// Coordinates are one-based and inclusive, as they appear in the annotation file.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    seq_name: String,
    start: u64,
    end: u64,
    strand: Strand,
    kind: String,
    attributes: HashMap<String, String>,
}

impl Feature {

    pub fn new<T, K>(seq_name: T, start: u64, end: u64, strand: Strand, kind: K) -> Feature
        where T: Into<String>, K: Into<String>
    {
        Feature {
            seq_name: seq_name.into(),
            start: start,
            end: end,
            strand: strand,
            kind: kind.into(),
            attributes: HashMap::new(),
        }
    }

    /// Adds an attribute and returns the feature itself.
    pub fn with_attribute<K, V>(mut self, key: K, value: V) -> Feature
        where K: Into<String>, V: Into<String>
    {
        let _ = self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the primary type tag, i.e. the third annotation column.
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the value of the given attribute key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    /// Distance between the start and end coordinates.
    ///
    /// This is one less than the number of covered bases.
    #[inline]
    pub fn span(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// A zero-based, half-open extraction interval, i.e. one BED row.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    seq_name: String,
    interval: Interval<u64>,
    name: String,
    strand: Strand,
}

impl Region {

    /// Creates a region from zero-based, half-open coordinates.
    ///
    /// Returns `None` when `end` is smaller than `start`.
    pub fn new<T, N>(
        seq_name: T,
        start: u64,
        end: u64,
        name: N,
        strand: Strand,
    ) -> Option<Region>
        where T: Into<String>, N: Into<String>
    {
        Interval::new(start..end).ok()
            .map(|iv| Region {
                seq_name: seq_name.into(),
                interval: iv,
                name: name.into(),
                strand: strand,
            })
    }

    /// Creates the region covering a feature, named by the given identifier.
    ///
    /// Returns `None` for features that cover no bases or whose start coordinate is zero.
    pub fn from_feature<N>(feature: &Feature, name: N) -> Option<Region>
        where N: Into<String>
    {
        let start0 = feature.start().checked_sub(1)?;
        if start0 >= feature.end() {
            return None;
        }
        Region::new(feature.seq_name(), start0, feature.end(), name, feature.strand())
    }

    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    pub fn start(&self) -> u64 {
        self.interval.start
    }

    pub fn end(&self) -> u64 {
        self.interval.end
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Placeholder BED score.
    pub fn score(&self) -> u32 {
        BED_SCORE
    }
}

/// A translated feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Protein {
    id: String,
    residues: Vec<u8>,
}

impl Protein {

    pub fn new<T: Into<String>>(id: T, residues: Vec<u8>) -> Protein {
        Protein { id: id.into(), residues: residues }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The number of residues that could not be resolved from their codons.
    pub fn unknown_count(&self) -> usize {
        self.residues.iter().filter(|&&r| r == UNKNOWN_RESIDUE).count()
    }
}

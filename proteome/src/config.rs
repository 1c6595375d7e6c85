//! Settings of a single extraction run.
use std::path::{Path, PathBuf};

use regex::{Error as RegexError, Regex};

use translate::GeneticCode;


/// Feature types whose sequences are extracted by default.
const DEFAULT_FEATURE_TYPES: &'static str = "CDS|ncRNA|tRNA|tmRNA|rRNA";

/// Attribute key holding the feature identifier.
const DEFAULT_ID_ATTR: &'static str = "ID";

/// Minimum distance between feature start and end coordinates.
const DEFAULT_MIN_GENE_SIZE: u64 = 120;

/// Maximum percentage of unknown residues in a retained protein.
const DEFAULT_MAX_UNKNOWNS_PCT: f64 = 5.0;

/// NCBI genetic code used for translation (bacterial, archaeal, and plant plastid).
const DEFAULT_TRANSLATION_TABLE: u8 = 11;

quick_error! {
    /// Errors that occur when validating a configuration.
    #[derive(Debug)]
    pub enum ConfigError {
        /// Occurs when the unknown residue percentage is not within 0 and 100.
        InvalidPercentage(value: f64) {
            description("percentage of unknown residues must be between 0 and 100")
            display("percentage of unknown residues must be between 0 and 100, got: {}", value)
        }
        /// Occurs when no genetic-code table exists for the given index.
        UnknownTranslationTable(id: u8) {
            description("unsupported translation table")
            display("unsupported translation table: {}", id)
        }
        /// Occurs when the identifier attribute key is empty.
        EmptyIdAttr {
            description("identifier attribute key must not be empty")
            display("identifier attribute key must not be empty")
        }
        /// Occurs when the feature type pattern is not a valid regular expression.
        InvalidFeatureTypes(err: RegexError) {
            description("invalid feature type pattern")
            display("invalid feature type pattern: {}", err)
            cause(err)
        }
    }
}

/// Immutable settings of an extraction run.
///
/// A configuration is built up front and handed to the pipeline, which never changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    min_gene_size: u64,
    max_unknowns_percentage: f64,
    apply_unknowns_filter: bool,
    translation_table: u8,
    feature_types: String,
    id_attr: String,
    work_dir_parent: Option<PathBuf>,
}

impl Default for Config {

    fn default() -> Config {
        Config {
            min_gene_size: DEFAULT_MIN_GENE_SIZE,
            max_unknowns_percentage: DEFAULT_MAX_UNKNOWNS_PCT,
            apply_unknowns_filter: true,
            translation_table: DEFAULT_TRANSLATION_TABLE,
            feature_types: DEFAULT_FEATURE_TYPES.to_owned(),
            id_attr: DEFAULT_ID_ATTR.to_owned(),
            work_dir_parent: None,
        }
    }
}

impl Config {

    /// Returns the minimum `end - start` distance of a retained feature.
    pub fn min_gene_size(&self) -> u64 {
        self.min_gene_size
    }

    /// Sets the minimum `end - start` distance of a retained feature.
    pub fn set_min_gene_size(&mut self, size: u64) -> &mut Self {
        self.min_gene_size = size;
        self
    }

    /// Returns the maximum percentage of unknown residues in a retained protein.
    pub fn max_unknowns_percentage(&self) -> f64 {
        self.max_unknowns_percentage
    }

    /// Sets the maximum percentage of unknown residues in a retained protein.
    pub fn set_max_unknowns_percentage(&mut self, pct: f64) -> &mut Self {
        self.max_unknowns_percentage = pct;
        self
    }

    /// Returns whether unknown residue filtering was requested.
    ///
    /// The pipeline runs the filter regardless of this value. Callers that drive the stages
    /// themselves use it to decide whether to call [`filter_file`](fn.filter_file.html).
    pub fn apply_unknowns_filter(&self) -> bool {
        self.apply_unknowns_filter
    }

    /// Sets whether unknown residue filtering was requested.
    pub fn set_apply_unknowns_filter(&mut self, apply: bool) -> &mut Self {
        self.apply_unknowns_filter = apply;
        self
    }

    /// Returns the NCBI genetic-code table index.
    pub fn translation_table(&self) -> u8 {
        self.translation_table
    }

    /// Sets the NCBI genetic-code table index.
    pub fn set_translation_table(&mut self, table: u8) -> &mut Self {
        self.translation_table = table;
        self
    }

    /// Returns the alternation of accepted feature types.
    pub fn feature_types(&self) -> &str {
        self.feature_types.as_str()
    }

    /// Sets the accepted feature types, as a regular expression alternation.
    ///
    /// The pattern is matched against the whole type column, so `CDS|tRNA` does not accept
    /// `pre_tRNA`.
    pub fn set_feature_types<T>(&mut self, pattern: T) -> &mut Self
        where T: Into<String>
    {
        self.feature_types = pattern.into();
        self
    }

    /// Returns the attribute key of feature identifiers.
    pub fn id_attr(&self) -> &str {
        self.id_attr.as_str()
    }

    /// Sets the attribute key of feature identifiers.
    pub fn set_id_attr<T>(&mut self, key: T) -> &mut Self
        where T: Into<String>
    {
        self.id_attr = key.into();
        self
    }

    /// Returns the directory in which working directories are created, if set.
    pub fn work_dir_parent(&self) -> Option<&Path> {
        self.work_dir_parent.as_ref().map(|p| p.as_path())
    }

    /// Sets the directory in which working directories are created.
    ///
    /// When unset, the system temporary directory is used.
    pub fn set_work_dir_parent<P>(&mut self, dir: Option<P>) -> &mut Self
        where P: Into<PathBuf>
    {
        self.work_dir_parent = dir.map(|d| d.into());
        self
    }

    /// Compiles the anchored feature type pattern.
    pub fn feature_type_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&format!("^(?:{})$", self.feature_types))
            .map_err(ConfigError::InvalidFeatureTypes)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct = self.max_unknowns_percentage;
        if !(pct >= 0.0 && pct <= 100.0) {
            return Err(ConfigError::InvalidPercentage(pct));
        }
        if GeneticCode::from_id(self.translation_table).is_none() {
            return Err(ConfigError::UnknownTranslationTable(self.translation_table));
        }
        if self.id_attr.is_empty() {
            return Err(ConfigError::EmptyIdAttr);
        }
        let _ = self.feature_type_regex()?;
        Ok(())
    }
}

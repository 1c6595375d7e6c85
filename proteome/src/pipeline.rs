/*! Extraction pipeline.

A [`Pipeline`] turns one annotation file into one protein FASTA file. The stages run strictly in
order and hand their results to each other as files inside the working directory of the pipeline:

1. annotation features are selected and written as BED regions,
2. the embedded assembly is split out and the regions are extracted from it,
3. the extracted sequences are translated,
4. proteins with too many unknown residues are removed.

Intermediate files are named after the output file and removed once their consumer has run.
*/
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::{self, TempDir};

use config::{Config, ConfigError};
use consts::PROTEIN_EXT;
use extract::{Extraction, Extractor};
use filter::{Filter, filter_file};
use io_bed::Writer as BedWriter;
use io_gff::{Reader as GffReader, write_embedded_assembly};
use model::Region;
use select::Selector;
use translate::{GeneticCode, strip_header_quotes, translate_file};
use utils::remove_if_exists;


/// Prefix of pipeline working directories.
const WORK_DIR_PREFIX: &'static str = "proteome.";

/// Output stem used when the annotation path has no file name.
const DEFAULT_STEM: &'static str = "proteome";

const BED_SUFFIX: &'static str = ".intermediate.bed";
const REFERENCE_SUFFIX: &'static str = ".intermediate.fa";
const REFERENCE_INDEX_SUFFIX: &'static str = ".intermediate.fa.fai";
const EXTRACTED_SUFFIX: &'static str = ".intermediate.extracted.fa";
const TRANSLATED_SUFFIX: &'static str = ".intermediate.translate.fa";
const UNFILTERED_SUFFIX: &'static str = ".unfiltered.fa";
const FILTERED_TMP_SUFFIX: &'static str = ".tmp.filtered.fa";

/// Record counts of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Features selected from the annotation.
    pub features_selected: usize,
    /// Sequences written by the extractor.
    pub sequences_extracted: usize,
    /// Proteins translated from the extracted sequences.
    pub proteins_translated: usize,
    /// Proteins left after filtering.
    pub proteins_retained: usize,
}

impl fmt::Display for Summary {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} features selected, {} sequences extracted, {} proteins translated, \
                   {} proteins retained",
               self.features_selected, self.sequences_extracted, self.proteins_translated,
               self.proteins_retained)
    }
}

/// Paths of the intermediate files, derived from the output path.
#[derive(Debug)]
struct Artifacts {
    output: PathBuf,
}

impl Artifacts {

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = OsString::from(self.output.as_os_str());
        path.push(suffix);
        PathBuf::from(path)
    }

    fn bed(&self) -> PathBuf {
        self.with_suffix(BED_SUFFIX)
    }

    fn reference(&self) -> PathBuf {
        self.with_suffix(REFERENCE_SUFFIX)
    }

    fn reference_index(&self) -> PathBuf {
        self.with_suffix(REFERENCE_INDEX_SUFFIX)
    }

    fn extracted(&self) -> PathBuf {
        self.with_suffix(EXTRACTED_SUFFIX)
    }

    fn translated(&self) -> PathBuf {
        self.with_suffix(TRANSLATED_SUFFIX)
    }

    fn unfiltered(&self) -> PathBuf {
        self.with_suffix(UNFILTERED_SUFFIX)
    }

    fn filtered_tmp(&self) -> PathBuf {
        self.with_suffix(FILTERED_TMP_SUFFIX)
    }
}

/// Extracts the proteome of one annotation file.
///
/// The working directory is created with the pipeline and removed, together with the output,
/// when the pipeline is dropped. Copy the output elsewhere to keep it.
pub struct Pipeline<E: Extractor> {
    gff_path: PathBuf,
    config: Config,
    selector: Selector,
    code: GeneticCode,
    filter: Filter,
    extractor: E,
    work_dir: TempDir,
    artifacts: Artifacts,
    summary: Option<Summary>,
}

impl<E: Extractor> Pipeline<E> {

    /// Creates a pipeline for the given annotation file.
    ///
    /// Fails when the config is invalid or the working directory can not be created. The
    /// annotation file itself is only opened by [`output`](#method.output).
    pub fn new<P: Into<PathBuf>>(gff_path: P, config: Config, extractor: E) -> ::Result<Self> {
        config.validate()?;
        let code = GeneticCode::from_id(config.translation_table())
            .ok_or(ConfigError::UnknownTranslationTable(config.translation_table()))?;

        let work_dir = {
            let mut builder = tempfile::Builder::new();
            let _ = builder.prefix(WORK_DIR_PREFIX);
            match config.work_dir_parent() {
                Some(parent) => builder.tempdir_in(parent)?,
                None => builder.tempdir()?,
            }
        };

        let gff_path = gff_path.into();
        let stem = gff_path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_STEM.to_owned());
        let output = work_dir.path().join(format!("{}.{}", stem, PROTEIN_EXT));
        debug!("working directory of {}: {}", gff_path.display(), work_dir.path().display());

        Ok(Pipeline {
            selector: Selector::new(&config)?,
            filter: Filter::from_config(&config),
            gff_path: gff_path,
            config: config,
            code: code,
            extractor: extractor,
            work_dir: work_dir,
            artifacts: Artifacts { output: output },
            summary: None,
        })
    }

    pub fn gff_path(&self) -> &Path {
        self.gff_path.as_path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Returns the path the protein file is written to, whether or not it exists yet.
    pub fn output_path(&self) -> &Path {
        self.artifacts.output.as_path()
    }

    /// Returns the record counts, once the pipeline has run.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Runs the pipeline if it has not run yet and returns the path of the protein file.
    ///
    /// The stages run at most once per pipeline; later calls return the same path without
    /// touching the file. A run that retains no protein still succeeds, leaving an empty file.
    pub fn output(&mut self) -> ::Result<&Path> {
        if self.summary.is_none() {
            let summary = self.run()?;
            self.summary = Some(summary);
        }
        Ok(self.artifacts.output.as_path())
    }

    fn run(&self) -> ::Result<Summary> {
        info!("extracting proteins from {}", self.gff_path.display());

        let regions = self.select_regions()?;
        self.export_regions(&regions)?;
        self.extract_sequences()?;
        let (extracted, translated) = self.translate_sequences()?;
        let retained = self.filter_proteins()?;

        let summary = Summary {
            features_selected: regions.len(),
            sequences_extracted: extracted,
            proteins_translated: translated,
            proteins_retained: retained,
        };
        info!("{}: {}", self.gff_path.display(), summary);
        Ok(summary)
    }

    fn select_regions(&self) -> ::Result<Vec<Region>> {
        let mut reader = GffReader::from_file(&self.gff_path)?;
        Ok(self.selector.regions(reader.features()))
    }

    fn export_regions(&self, regions: &[Region]) -> ::Result<()> {
        let path = self.artifacts.bed();
        let n = BedWriter::from_file(&path)?.write_regions(regions)?;
        debug!("wrote {} regions to {}", n, path.display());
        Ok(())
    }

    fn extract_sequences(&self) -> ::Result<()> {
        let (reference, bed) = (self.artifacts.reference(), self.artifacts.bed());
        if !write_embedded_assembly(&self.gff_path, &reference)? {
            warn!("{} has no embedded assembly after a ##FASTA line", self.gff_path.display());
        }

        let extracted = self.artifacts.extracted();
        let job = Extraction {
            reference: &reference,
            regions: &bed,
            output: &extracted,
            stranded: true,
            named: true,
        };
        debug!("extracting regions with {}", self.extractor.name());
        if let Err(e) = self.extractor.extract(&job) {
            error!("{} extraction failed for {}: {}",
                   self.extractor.name(), self.gff_path.display(), e);
        }

        remove_if_exists(&reference)?;
        remove_if_exists(self.artifacts.reference_index())?;
        remove_if_exists(&bed)?;
        Ok(())
    }

    fn translate_sequences(&self) -> ::Result<(usize, usize)> {
        let (extracted, translated) = (self.artifacts.extracted(), self.artifacts.translated());
        let counts = translate_file(&extracted, &translated, &self.code,
                                    self.extractor.decorates_names())?;
        remove_if_exists(&extracted)?;

        if strip_header_quotes(&translated, self.artifacts.unfiltered())? {
            remove_if_exists(&translated)?;
        }
        Ok(counts)
    }

    fn filter_proteins(&self) -> ::Result<usize> {
        if !self.config.apply_unknowns_filter() {
            debug!("unknown residue filtering is part of every pipeline run and is applied anyway");
        }
        let unfiltered = self.artifacts.unfiltered();
        let (n_read, n_kept) = filter_file(&unfiltered, self.artifacts.filtered_tmp(),
                                           &self.artifacts.output, &self.filter)?;
        remove_if_exists(&unfiltered)?;
        debug!("kept {} of {} proteins with at most {}% unknown residues",
               n_kept, n_read, self.config.max_unknowns_percentage());

        if n_kept == 0 {
            error!("could not extract any protein sequences from {}; does the file contain the \
                    assembly as well as the annotation?", self.gff_path.display());
        }
        Ok(n_kept)
    }
}

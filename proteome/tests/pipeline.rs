extern crate bio;
extern crate log;
#[macro_use]
extern crate matches;
extern crate proteome;
extern crate tempfile;
extern crate testing_logger;

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bio::io::fasta;
use log::Level;
use proteome::{Config, ConfigError, Error, Extraction, Extractor, GffError, Native, Pipeline};


const CDS_FWD: &'static str = "MPGYRSLSATSQNLGMLLSRRSLSTRLATSGLKKNGLTNRL";
const CDS_REV: &'static str = "MLLTDYPRYTSTPTARCSNTKWQSTVSTLKLIRTRAPINGI";
const CDS_EDGE: &'static str = "MHRHNINXISDSGPIRSSLVRPSTRARPVQXSHFGIHCKSI";


fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

fn read_proteins(path: &Path) -> Vec<(String, String)> {
    fasta::Reader::new(fs::File::open(path).expect("an output file"))
        .records()
        .map(|r| r.expect("a protein record"))
        .map(|r| (r.id().to_owned(), String::from_utf8(r.seq().to_vec()).expect("residues")))
        .collect()
}

/// Native extractor that counts its invocations.
struct CountingExtractor {
    calls: Cell<usize>,
}

impl Extractor for CountingExtractor {

    fn name(&self) -> &str {
        "counting"
    }

    fn extract(&self, job: &Extraction) -> proteome::Result<()> {
        self.calls.set(self.calls.get() + 1);
        Native.extract(job)
    }
}

/// Extractor that always fails, leaving no output behind.
struct FailingExtractor;

impl Extractor for FailingExtractor {

    fn name(&self) -> &str {
        "failing"
    }

    fn extract(&self, _job: &Extraction) -> proteome::Result<()> {
        Err(Error::from(io::Error::new(io::ErrorKind::Other, "extractor unavailable")))
    }
}

#[test]
fn proteins_from_assembly() {
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), Config::default(), Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();

    assert_eq!(output.file_name().and_then(|n| n.to_str()), Some("assembly.faa"));
    assert_eq!(read_proteins(&output), vec![
        ("cds_fwd".to_owned(), CDS_FWD.to_owned()),
        ("cds_rev".to_owned(), CDS_REV.to_owned()),
        ("cds_edge".to_owned(), CDS_EDGE.to_owned()),
    ]);

    let summary = pipeline.summary().expect("a summary");
    assert_eq!(summary.features_selected, 4);
    assert_eq!(summary.sequences_extracted, 4);
    assert_eq!(summary.proteins_translated, 4);
    assert_eq!(summary.proteins_retained, 3);
}

#[test]
fn headers_are_bare_identifiers() {
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), Config::default(), Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    let text = fs::read_to_string(&output).expect("output text");
    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with('>')).collect();
    assert_eq!(headers, vec![">cds_fwd", ">cds_rev", ">cds_edge"]);
    assert!(!text.contains('"'));
    assert!(!text.contains('\''));
}

#[test]
fn identifiers_with_inner_quotes_and_decoration_lookalikes() {
    let mut pipeline = Pipeline::new(data_path("unusual_ids.gff"), Config::default(), Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    assert_eq!(read_proteins(&output), vec![
        ("cds7".to_owned(), CDS_FWD.to_owned()),
        ("ab".to_owned(), CDS_REV.to_owned()),
        ("orf(+)".to_owned(), CDS_EDGE.to_owned()),
        ("locus::1".to_owned(), CDS_FWD.to_owned()),
    ]);
}

#[test]
fn raised_unknown_threshold() {
    let mut config = Config::default();
    let _ = config.set_max_unknowns_percentage(10.0);
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), config, Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    let ids: Vec<String> = read_proteins(&output).into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["cds_fwd", "cds_rev", "cds_amb", "cds_edge"]);
}

#[test]
fn feature_types_and_size() {
    let mut config = Config::default();
    let _ = config.set_feature_types("gene").set_min_gene_size(60);
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), config, Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    assert_eq!(read_proteins(&output), vec![("gene_fwd".to_owned(), CDS_FWD.to_owned())]);
}

#[test]
fn output_runs_once() {
    let extractor = CountingExtractor { calls: Cell::new(0) };
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), Config::default(), &extractor)
        .expect("a pipeline");
    let first = pipeline.output().expect("an output path").to_path_buf();
    let modified = fs::metadata(&first).and_then(|m| m.modified()).expect("a timestamp");
    let second = pipeline.output().expect("an output path").to_path_buf();

    assert_eq!(first, second);
    assert_eq!(extractor.calls.get(), 1);
    assert_eq!(fs::metadata(&second).and_then(|m| m.modified()).expect("a timestamp"), modified);
}

#[test]
fn intermediate_files_removed() {
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), Config::default(), Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    let entries: Vec<PathBuf> = fs::read_dir(pipeline.work_dir())
        .expect("a working directory")
        .map(|e| e.expect("a directory entry").path())
        .collect();
    assert_eq!(entries, vec![output]);
}

#[test]
fn work_dir_in_parent() {
    let parent = tempfile::tempdir().expect("a parent directory");
    let mut config = Config::default();
    let _ = config.set_work_dir_parent(Some(parent.path()));
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), config, Native)
        .expect("a pipeline");
    assert!(pipeline.work_dir().starts_with(parent.path()));
    assert!(pipeline.output().expect("an output path").starts_with(parent.path()));
}

#[test]
fn no_selected_features() {
    let mut pipeline = Pipeline::new(data_path("wrong_types.gff"), Config::default(), Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    assert_eq!(fs::metadata(&output).expect("an output file").len(), 0);
    assert_eq!(pipeline.summary().map(|s| s.features_selected), Some(0));
}

#[test]
fn no_proteins_logged_as_error() {
    testing_logger::setup();
    let mut pipeline = Pipeline::new(data_path("wrong_types.gff"), Config::default(), Native)
        .expect("a pipeline");
    let _ = pipeline.output().expect("an output path");
    testing_logger::validate(|logs| {
        let errors: Vec<&str> = logs.iter()
            .filter(|l| l.level == Level::Error)
            .map(|l| l.body.as_str())
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("could not extract any protein sequences from"));
        assert!(errors[0].contains("wrong_types.gff"));
        assert!(errors[0].contains("assembly as well as the annotation"));
    });
}

#[test]
fn retained_proteins_log_no_error() {
    testing_logger::setup();
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), Config::default(), Native)
        .expect("a pipeline");
    let _ = pipeline.output().expect("an output path");
    testing_logger::validate(|logs| {
        assert!(logs.iter().all(|l| l.level != Level::Error));
    });
}

#[test]
fn no_embedded_assembly() {
    let mut pipeline = Pipeline::new(data_path("no_assembly.gff"), Config::default(), Native)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    assert!(read_proteins(&output).is_empty());
    let summary = pipeline.summary().expect("a summary");
    assert_eq!(summary.features_selected, 4);
    assert_eq!(summary.sequences_extracted, 0);
    assert_eq!(summary.proteins_retained, 0);
}

#[test]
fn failed_extraction_is_not_fatal() {
    let mut pipeline = Pipeline::new(data_path("assembly.gff"), Config::default(),
                                     FailingExtractor)
        .expect("a pipeline");
    let output = pipeline.output().expect("an output path").to_path_buf();
    assert_eq!(fs::metadata(&output).expect("an output file").len(), 0);
    assert_eq!(pipeline.summary().map(|s| s.proteins_translated), Some(0));
}

#[test]
fn unreadable_annotation() {
    let mut pipeline = Pipeline::new(data_path("missing.gff"), Config::default(), Native)
        .expect("a pipeline");
    assert!(matches!(pipeline.output(), Err(Error::Gff(GffError::Unreadable(_, _)))));
    assert!(pipeline.summary().is_none());
}

#[test]
fn invalid_configs() {
    let mut config = Config::default();
    let _ = config.set_max_unknowns_percentage(120.0);
    assert!(matches!(Pipeline::new("a.gff", config, Native),
                     Err(Error::Config(ConfigError::InvalidPercentage(_)))));

    let mut config = Config::default();
    let _ = config.set_feature_types("CDS(");
    assert!(matches!(Pipeline::new("a.gff", config, Native),
                     Err(Error::Config(ConfigError::InvalidFeatureTypes(_)))));

    let mut config = Config::default();
    let _ = config.set_id_attr("");
    assert!(matches!(Pipeline::new("a.gff", config, Native),
                     Err(Error::Config(ConfigError::EmptyIdAttr))));
}

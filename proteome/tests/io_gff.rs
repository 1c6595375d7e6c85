extern crate proteome;
extern crate tempfile;

use std::fs;

use proteome::{Config, GffReader, Selector, Strand, write_embedded_assembly};


static ASSEMBLY_GFF: &'static str = include_str!("data/assembly.gff");
static UNUSUAL_IDS_GFF: &'static str = include_str!("data/unusual_ids.gff");


#[test]
fn gff_reader_stops_at_assembly() {
    let mut reader = GffReader::from_reader(ASSEMBLY_GFF.as_bytes());
    let features: Vec<_> = reader.features().map(|r| r.expect("a feature")).collect();
    assert_eq!(features.len(), 8);

    let kinds: Vec<&str> = features.iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, vec!["gene", "CDS", "CDS", "CDS", "CDS", "CDS", "CDS", "tRNA"]);

    let rev = &features[2];
    assert_eq!(rev.seq_name(), "contig1");
    assert_eq!((rev.start(), rev.end()), (201, 326));
    assert_eq!(rev.strand(), Strand::Reverse);
    assert_eq!(rev.attribute("ID"), Some("cds_rev"));
    assert_eq!(rev.attribute("product"), Some("putative transporter"));
    assert_eq!(features[3].attribute("ID"), None);
    assert_eq!(features[6].attribute("ID"), Some(""));
}

#[test]
fn gff_reader_keeps_inner_quotes() {
    let mut reader = GffReader::from_reader(UNUSUAL_IDS_GFF.as_bytes());
    let ids: Vec<String> = reader.features()
        .map(|r| r.expect("a feature"))
        .map(|f| f.attribute("ID").expect("an identifier").to_owned())
        .collect();
    assert_eq!(ids, vec!["cds\"7", "a'b", "orf(+)", "locus::1"]);
}

#[test]
fn selected_regions() {
    let selector = Selector::new(&Config::default()).expect("a selector");
    let mut reader = GffReader::from_reader(ASSEMBLY_GFF.as_bytes());
    let regions = selector.regions(reader.features());

    let named: Vec<(&str, u64, u64, Strand)> = regions.iter()
        .map(|r| (r.name(), r.start(), r.end(), r.strand()))
        .collect();
    assert_eq!(named, vec![
        ("cds_fwd", 10, 136, Strand::Forward),
        ("cds_rev", 200, 326, Strand::Reverse),
        ("cds_amb", 376, 502, Strand::Forward),
        ("cds_edge", 542, 668, Strand::Forward),
    ]);
}

#[test]
fn embedded_assembly_copied() {
    let dir = tempfile::tempdir().expect("a temporary directory");
    let gff = dir.path().join("assembly.gff");
    let fasta = dir.path().join("assembly.fa");
    fs::write(&gff, ASSEMBLY_GFF).expect("a written annotation");

    assert!(write_embedded_assembly(&gff, &fasta).expect("a copied assembly"));
    let text = fs::read_to_string(&fasta).expect("assembly text");
    assert!(text.starts_with(">contig1\n"));
    let bases: usize = text.lines().skip(1).map(|l| l.trim().len()).sum();
    assert_eq!(bases, 784);
}

#[test]
fn missing_assembly_gives_empty_file() {
    let dir = tempfile::tempdir().expect("a temporary directory");
    let fasta = dir.path().join("assembly.fa");
    let gff = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/no_assembly.gff");

    assert!(!write_embedded_assembly(gff, &fasta).expect("an empty assembly"));
    assert_eq!(fs::metadata(&fasta).expect("an assembly file").len(), 0);
}

//! Selection of the annotation features whose sequences are extracted.
use regex::Regex;

use config::Config;
use io_gff::GffError;
use model::{Feature, Region};
use utils::strip_quotes;


/// Filters annotation features into extraction regions.
#[derive(Debug, Clone)]
pub struct Selector {
    feature_types: Regex,
    id_attr: String,
    min_gene_size: u64,
}

impl Selector {

    /// Creates a selector from the feature type, identifier, and size settings of a config.
    pub fn new(config: &Config) -> ::Result<Selector> {
        Ok(Selector {
            feature_types: config.feature_type_regex()?,
            id_attr: config.id_attr().to_owned(),
            min_gene_size: config.min_gene_size(),
        })
    }

    /// Returns the region of the given feature, or `None` when the feature is not selected.
    ///
    /// A feature is selected when its type matches, it carries a non-empty identifier once
    /// quotes are removed, and its span is at least the minimum gene size.
    pub fn select(&self, feature: &Feature) -> Option<Region> {
        if !self.feature_types.is_match(feature.kind()) {
            return None;
        }
        let raw_id = feature.attribute(&self.id_attr)?;
        if feature.span() < self.min_gene_size {
            return None;
        }
        let id = strip_quotes(raw_id);
        if id.is_empty() {
            return None;
        }
        Region::from_feature(feature, id)
    }

    /// Selects regions from a stream of parsed features.
    ///
    /// Rows that failed to parse are logged and skipped. Regions keep the order of the input.
    pub fn regions<I>(&self, features: I) -> Vec<Region>
        where I: IntoIterator<Item = Result<Feature, GffError>>
    {
        let mut regions = Vec::new();
        let (mut n_seen, mut n_invalid) = (0usize, 0usize);
        for result in features {
            n_seen += 1;
            match result {
                Ok(feature) => {
                    if let Some(region) = self.select(&feature) {
                        regions.push(region);
                    }
                },
                Err(e) => {
                    n_invalid += 1;
                    warn!("skipping annotation row: {}", e);
                },
            }
        }
        debug!("selected {} of {} annotation rows ({} unparseable)",
               regions.len(), n_seen, n_invalid);
        regions
    }
}

#[cfg(test)]
mod test_select {
    use super::*;
    use model::Strand;

    fn make_feature(kind: &str, start: u64, end: u64, id: Option<&str>) -> Feature {
        let fx = Feature::new("ctg1", start, end, Strand::Forward, kind);
        match id {
            Some(v) => fx.with_attribute("ID", v),
            None => fx,
        }
    }

    fn default_selector() -> Selector {
        Selector::new(&Config::default()).unwrap()
    }

    #[test]
    fn accepts_default_types() {
        let sel = default_selector();
        for kind in &["CDS", "ncRNA", "tRNA", "tmRNA", "rRNA"] {
            assert!(sel.select(&make_feature(kind, 1, 500, Some("f"))).is_some(), "{}", kind);
        }
    }

    #[test]
    fn rejects_other_types() {
        let sel = default_selector();
        for kind in &["gene", "mRNA", "exon", "repeat_region", "misc_RNA", "CDS_motif"] {
            assert!(sel.select(&make_feature(kind, 1, 500, Some("f"))).is_none(), "{}", kind);
        }
    }

    #[test]
    fn span_boundary() {
        let sel = default_selector();
        assert!(sel.select(&make_feature("CDS", 100, 220, Some("f"))).is_some());
        assert!(sel.select(&make_feature("CDS", 100, 219, Some("f"))).is_none());
        assert!(sel.select(&make_feature("tRNA", 1, 72, Some("f"))).is_none());
    }

    #[test]
    fn custom_size_and_types() {
        let mut config = Config::default();
        let _ = config.set_min_gene_size(0).set_feature_types("gene");
        let sel = Selector::new(&config).unwrap();
        assert!(sel.select(&make_feature("gene", 5, 5, Some("g"))).is_some());
        assert!(sel.select(&make_feature("CDS", 1, 500, Some("c"))).is_none());
    }

    #[test]
    fn requires_identifier() {
        let sel = default_selector();
        let fx = make_feature("CDS", 1, 500, None).with_attribute("locus_tag", "L1");
        assert!(sel.select(&fx).is_none());
    }

    #[test]
    fn custom_identifier_attribute() {
        let mut config = Config::default();
        let _ = config.set_id_attr("locus_tag");
        let sel = Selector::new(&config).unwrap();
        let fx = make_feature("CDS", 1, 500, Some("ignored")).with_attribute("locus_tag", "L1");
        assert_eq!(sel.select(&fx).unwrap().name(), "L1");
    }

    #[test]
    fn strips_quotes() {
        let sel = default_selector();
        let region = sel.select(&make_feature("CDS", 1, 500, Some("\"cds'1\""))).unwrap();
        assert_eq!(region.name(), "cds1");
        assert!(sel.select(&make_feature("CDS", 1, 500, Some("\"\""))).is_none());
        assert!(sel.select(&make_feature("CDS", 1, 500, Some("''"))).is_none());
    }

    #[test]
    fn coordinates_are_zero_based() {
        let sel = default_selector();
        let fx = Feature::new("ctg2", 1001, 1500, Strand::Reverse, "CDS")
            .with_attribute("ID", "c");
        let region = sel.select(&fx).unwrap();
        assert_eq!(region.seq_name(), "ctg2");
        assert_eq!(region.start(), 1000);
        assert_eq!(region.end(), 1500);
        assert_eq!(region.strand(), Strand::Reverse);
    }

    #[test]
    fn regions_keep_order_and_skip_errors() {
        let sel = default_selector();
        let bad_row = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes())
            .records()
            .filter_map(|r| r.err())
            .next()
            .unwrap();
        let input = vec![
            Ok(make_feature("CDS", 1, 500, Some("b"))),
            Err(GffError::from(bad_row)),
            Ok(make_feature("gene", 1, 500, Some("x"))),
            Ok(make_feature("CDS", 1, 500, Some("a"))),
            Ok(make_feature("CDS", 1, 500, Some("b"))),
        ];
        let names: Vec<String> = sel.regions(input).iter()
            .map(|r| r.name().to_owned())
            .collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }
}

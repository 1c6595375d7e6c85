use std::fs;
use std::io::{self, Write};

use clap::{App, Arg, ArgMatches, SubCommand};
use proteome::{Bedtools, Config, Extractor, Native, Pipeline};

use tools::TEMPLATE_SUBCMD;
use utils::resolve_writer;

pub const NAME: &'static str = "gff-to-proteins";

const EXTRACTORS: &'static [&'static str] = &["auto", "bedtools", "native"];


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Extracts protein sequences from a GFF3 file with an embedded assembly")
        .template(TEMPLATE_SUBCMD)
        .arg(Arg::with_name("input")
                .value_name("input")
                .help("Path to input GFF3 file")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("output")
                .value_name("output")
                .help("Path to output protein FASTA file or '-' for stdout")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("min-gene-size")
                .long("min-gene-size")
                .value_name("NT")
                .help("Minimum feature span, end minus start [default: 120]")
                .takes_value(true))
        .arg(Arg::with_name("max-unknowns")
                .long("max-unknowns")
                .value_name("PCT")
                .help("Maximum percentage of unknown residues per protein [default: 5]")
                .takes_value(true))
        .arg(Arg::with_name("table")
                .long("table")
                .value_name("ID")
                .help("NCBI genetic code table, see the tables subcommand [default: 11]")
                .takes_value(true))
        .arg(Arg::with_name("feature-types")
                .long("feature-types")
                .value_name("REGEX")
                .help("Pattern the whole feature type must match \
                       [default: CDS|ncRNA|tRNA|tmRNA|rRNA]")
                .takes_value(true))
        .arg(Arg::with_name("id-attr")
                .long("id-attr")
                .value_name("KEY")
                .help("Attribute holding the feature identifier [default: ID]")
                .takes_value(true))
        .arg(Arg::with_name("extractor")
                .long("extractor")
                .value_name("NAME")
                .help("Sequence extractor; auto uses bedtools when it is on PATH")
                .possible_values(EXTRACTORS)
                .default_value("auto")
                .takes_value(true))
        .arg(Arg::with_name("bedtools")
                .long("bedtools")
                .value_name("PATH")
                .help("Path to the bedtools executable")
                .takes_value(true))
        .arg(Arg::with_name("work-dir")
                .long("work-dir")
                .value_name("DIR")
                .help("Directory for the temporary working directory")
                .takes_value(true))
}

pub fn run(args: &ArgMatches) -> ::Result<()> {
    let input = args.value_of("input").unwrap_or_default();
    let output = args.value_of("output").unwrap_or_default();

    let config = build_config(args)?;
    let extractor = build_extractor(args)?;
    info!("using the {} extractor", extractor.name());

    let mut pipeline = Pipeline::new(input, config, extractor)?;
    let mut reader = fs::File::open(pipeline.output()?)?;
    let mut writer = resolve_writer(output)?;
    let _ = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;

    Ok(())
}

fn build_config(args: &ArgMatches) -> ::Result<Config> {
    let mut config = Config::default();
    if args.is_present("min-gene-size") {
        let _ = config.set_min_gene_size(value_t!(args, "min-gene-size", u64)?);
    }
    if args.is_present("max-unknowns") {
        let _ = config.set_max_unknowns_percentage(value_t!(args, "max-unknowns", f64)?);
    }
    if args.is_present("table") {
        let _ = config.set_translation_table(value_t!(args, "table", u8)?);
    }
    if let Some(pattern) = args.value_of("feature-types") {
        let _ = config.set_feature_types(pattern);
    }
    if let Some(key) = args.value_of("id-attr") {
        let _ = config.set_id_attr(key);
    }
    let _ = config.set_work_dir_parent(args.value_of("work-dir"));
    Ok(config)
}

fn build_extractor(args: &ArgMatches) -> ::Result<Box<dyn Extractor>> {
    let bedtools = match args.value_of("bedtools") {
        Some(path) => Some(Bedtools::new(path)),
        None => Bedtools::locate(),
    };
    match args.value_of("extractor") {
        Some("native") => Ok(Box::new(Native)),
        Some("bedtools") => bedtools
            .map(|b| Box::new(b) as Box<dyn Extractor>)
            .ok_or(::Error::MissingBedtools),
        _ => Ok(bedtools
            .map(|b| Box::new(b) as Box<dyn Extractor>)
            .unwrap_or_else(|| Box::new(Native))),
    }
}

use std::io;

use clap::{App, AppSettings, Arg, ArgMatches};
use tools;

const TEMPLATE: &'static str = "
{bin} {version}
{about}


USAGE:
    {usage}

SUBCOMMANDS:
{subcommands}

OPTIONS:
{unified}";

const ABOUT: &'static str = "
proteometools extracts protein sequences from genome annotation files that
embed their assembly after a ##FASTA directive.";

const VERBOSE: &'static str = "verbose";

/// Constructs a new `clap::App` for argument parsing.
pub fn build_cli() -> App<'static, 'static> {
    App::new("proteometools")
        .version(crate_version!())
        .about(ABOUT)
        .template(TEMPLATE)
        .max_term_width(80)
        .settings(&[AppSettings::GlobalVersion,
                    AppSettings::SubcommandRequiredElseHelp,
                    AppSettings::DisableHelpSubcommand,
                    AppSettings::VersionlessSubcommands])
        .arg(Arg::with_name(VERBOSE)
                 .short("v")
                 .long("verbose")
                 .help("Logs every pipeline stage")
                 .global(true))
        .subcommand(tools::gff_to_proteins::build_cli())
        .subcommand(tools::tables::build_cli())
}

/// Returns whether verbose logging was requested before or after the subcommand.
pub fn is_verbose(matches: &ArgMatches) -> bool {
    matches.is_present(VERBOSE) ||
        matches.subcommand().1.map(|m| m.is_present(VERBOSE)).unwrap_or(false)
}

/// Runs the appropriate tool given the subcommand argument matches.
pub fn run(matches: ArgMatches) -> ::Result<()> {
    match matches.subcommand() {
        (tools::gff_to_proteins::NAME, Some(m)) => tools::gff_to_proteins::run(m),
        (tools::tables::NAME, Some(m)) => tools::tables::run(m),
        // Subcommands are required by the app settings.
        _ => Err(::Error::from(io::Error::new(io::ErrorKind::InvalidInput,
                                              "unexpected subcommand"))),
    }
}

use std::io::{self, Write};

use clap::{App, ArgMatches, SubCommand};
use proteome::GeneticCode;

use tools::TEMPLATE_SUBCMD;

pub const NAME: &'static str = "tables";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Lists the supported genetic code tables")
        .template(TEMPLATE_SUBCMD)
}

pub fn run(_args: &ArgMatches) -> ::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for code in GeneticCode::all() {
        writeln!(handle, "{}\t{}", code.id(), code.name())?;
    }
    Ok(())
}

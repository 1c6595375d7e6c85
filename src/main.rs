#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate proteome;
#[macro_use]
extern crate quick_error;

use std::io;
use std::process;

mod cli;
mod tools;
mod utils;


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Proteome(err: proteome::Error) {
            description("proteome extraction error")
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
            cause(err)
        }
        Arg(err: clap::Error) {
            description("invalid argument")
            display("{}", err)
            from()
            cause(err)
        }
        MissingBedtools {
            description("bedtools executable not found")
            display("bedtools executable not found on PATH; use --bedtools or --extractor native")
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;


fn main() {
    let matches = cli::build_cli().get_matches();
    utils::init_logging(cli::is_verbose(&matches));
    if let Err(err) = cli::run(matches) {
        error!("{}", err);
        process::exit(1);
    }
}

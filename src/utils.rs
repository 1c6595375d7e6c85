use std::fs;
use std::io::{self, BufWriter, Write};

use env_logger;


const STREAM_ARG: &'static str = "-";


pub fn resolve_writer(raw_arg: &str) -> ::Result<Box<dyn Write>>
{
    match raw_arg {
        STREAM_ARG => Ok(Box::new(io::stdout())),
        path => fs::File::create(path)
            .map_err(::Error::from)
            .map(|file| Box::new(BufWriter::new(file)) as Box<dyn Write>)
    }
}

/// Sets up logging to stderr at `info`, or `debug` when verbose. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

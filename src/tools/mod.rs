//! Functions invoked by the subcommands.

pub mod gff_to_proteins;
pub mod tables;

const TEMPLATE_SUBCMD: &'static str = "
USAGE:
    {usage}

ARGS:
{positionals}

OPTIONS:
{unified}";

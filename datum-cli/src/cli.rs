use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "datum-cli")]
#[clap(about = "Resolve and ingest data elements", long_about = None)]
pub struct Cli {
    #[clap(
        short,
        long,
        global = true,
        help = "Add debug messages to output logging"
    )]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

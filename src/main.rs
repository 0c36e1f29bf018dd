// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use pose_features::cli::args::{Cli, Commands};
use pose_features::cli::compare::{run_comparison, run_weights};
use pose_features::cli::extract::run_extraction;
use pose_features::cli::logging::set_verbose;
use pose_features::error;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Extract(args) => {
            set_verbose(args.verbose);
            run_extraction(args)
        }
        Commands::Weights(args) => run_weights(args),
        Commands::Compare(args) => {
            set_verbose(args.verbose);
            run_comparison(args)
        }
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}

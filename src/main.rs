// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;

use pose_mirror::cli::args::{Cli, Commands};
use pose_mirror::cli::run::run;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(&args),
    }
}

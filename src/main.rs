mod audit;
mod cli;
mod error;
mod export;
mod interaction;
mod logging;
mod modpack;
mod modrinth;
mod registry;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = workflow::execute_audit(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

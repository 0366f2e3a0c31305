use clap::Parser;

mod cli;
mod commands;

use cli::{CliArgs, Commands};

pub type CliResult<T> = steganowav_core::Result<T>;

fn main() {
    env_logger::init();

    let args = CliArgs::parse();
    let result = match args.command {
        Commands::Hide(cmd) => cmd.run(),
        Commands::Extract(cmd) => cmd.run(),
        Commands::Info(cmd) => cmd.run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

use failure::Error;
use structopt::StructOpt;

#[macro_use]
mod ui;

mod args;
mod commands;

use crate::{
    args::{Args, Command},
};


/// Errors are only pretty printed here, see `run()` for the interesting
/// part.
fn main() {
    if let Err(e) = run() {
        error!("An error occurred: {}", e);

        for cause in e.iter_causes() {
            error!("  ... caused by: {}", cause);
        }

        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args = Args::from_args();

    env_logger::Builder::new()
        .filter_level(args.global.log_level())
        .parse_default_env()
        .init();

    match &args.command {
        Command::Info { args } => commands::info::run(args)?,
        Command::Convert { args } => commands::convert::run(args)?,
    }

    Ok(())
}

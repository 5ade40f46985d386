use failure::Error;
use structopt::StructOpt;

#[macro_use]
mod ui;

mod args;
mod commands;
mod util;

use crate::{
    args::{Args, Command},
};


/// We just catch potential errors here and pretty print them. The actual
/// useful code is in `run()`.
fn main() {
    if let Err(e) = run() {
        error!("An error occured: {}", e);

        for cause in e.iter_causes() {
            error!("  ... caused by: {}", cause);
        }

        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args = Args::from_args();
    let global_args = &args.global;

    match &args.command {
        Command::Info { args } => commands::info::run(global_args, args)?,
        Command::Convert { args } => commands::convert::run(global_args, args)?,
        Command::Merge { args } => commands::merge::run(global_args, args)?,
    }

    Ok(())
}

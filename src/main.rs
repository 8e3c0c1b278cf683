use clap::Parser;
use env_logger::Env;
use log::error;
use snafu::ErrorCompat;

mod args;
mod room;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    // Logs go to stderr, the results may go to stdout.
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if let Err(e) = room::run_room(args.config, args.reference, args.out) {
        error!("Error occurred {:?}", e);
        eprintln!("An error occurred: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}

//! Mosaic CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use mosaic::cli::args::MosaicArgs;
use mosaic::cli::commands::execute_command;

fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn main() {
    let args = MosaicArgs::parse();

    // RUST_LOG, when set, refines the level chosen by -v/-q.
    Builder::new()
        .filter_level(log_level(args.verbosity()))
        .parse_env(Env::default())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

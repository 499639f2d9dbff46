mod args;
mod tab;

use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

use crate::args::{Args, Command};

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    debug!("args: {:?}", args);

    let res = match args.command {
        Command::Tabulate {
            config,
            input,
            out,
            reference,
            files,
        } => tab::run_tabulate(config, input, files, out, reference),
        Command::Chunk {
            config,
            input,
            chunk_size,
            out,
        } => tab::run_chunk(config, input, chunk_size, out),
        Command::Merge {
            config,
            template,
            out,
            replies,
        } => tab::run_merge(config, template, replies, out),
    };

    if let Err(e) = res {
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}

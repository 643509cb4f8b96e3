// src/main.rs

//! `pedigree` binary: prints the assembled pedigree of one person as JSON.

use std::process::ExitCode;

use pedigree::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("pedigree: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pedigree: {err:#}");
            ExitCode::FAILURE
        }
    }
}

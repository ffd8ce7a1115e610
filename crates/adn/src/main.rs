//! The main entry point for the ADN optimizer.

#![allow(unused_crate_dependencies)]

use adn_cli::{
    parse_args, run_optimizer,
    utils::{self, LogDestination},
};
use std::process::ExitCode;

fn main() -> ExitCode {
    utils::init_logger(LogDestination::Stderr);
    let opts = match parse_args(std::env::args_os()) {
        Ok(opts) => opts,
        Err(e) => e.exit(),
    };
    match run_optimizer(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            utils::report(&e);
            ExitCode::FAILURE
        }
    }
}

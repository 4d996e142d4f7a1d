use std::io;

mod app;
mod cli;
mod constants;
mod domain;
mod error;
mod logging;
mod storage;

fn main() -> Result<(), io::Error> {
    cli::run_cli()
}

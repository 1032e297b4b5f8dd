mod cli;
mod commands;
mod config;
mod error;
mod ingest;
mod model;
mod paths;
mod probes;
mod store;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

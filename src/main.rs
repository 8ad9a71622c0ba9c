mod cli;
mod install;
mod normalize;
mod request;
mod runner;

use std::ffi::OsString;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let args: Vec<OsString> = std::env::args_os().collect();
    if cli::version_requested(&args) {
        println!("{}", cli::VERSION_BANNER);
        return;
    }

    let cli = Cli::parse_from(args);

    if let Err(e) = cli.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

use clap::Parser;
use trendguard::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    trendguard::logging::init_logging();
    run(Cli::parse())
}

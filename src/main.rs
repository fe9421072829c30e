use clap::Parser;
use quantrebal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

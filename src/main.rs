use std::process::ExitCode;

use clap::Parser;
use rusty_tabula::cli::CliArgs;
use rusty_tabula::{pipeline, render};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.default_log_filter()),
    )
    .init();

    match run(&args) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> anyhow::Result<String> {
    let output = pipeline::run_query(&args.query())?;
    render::render(&output, args.format)
}

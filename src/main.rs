use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::LevelFilter;

use tidy_panda::cli::{Cli, TOOL_NAME};
use tidy_panda::TidyConfig;

fn main() -> ExitCode {
    let config = TidyConfig::from(Cli::parse());
    init_logging(config.quiet);

    match tidy_panda::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.is_broken_pipe() => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{TOOL_NAME}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(LevelFilter::Error);
    }
    builder.format_target(false).format_timestamp(None).init();
}

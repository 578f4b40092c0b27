/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Main executable for abtt-rs

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = abtt::cli::Cli::parse();

    // RUST_LOG takes precedence over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    abtt::cli::run(cli)
}

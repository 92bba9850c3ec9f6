//! Main entry point for gr
#![allow(dead_code)]
mod app;
mod cli;
mod error;
mod output;
mod pattern;
mod processor;
mod queue;
mod ring;
mod walker;

use clap::error::ErrorKind;
use clap::Parser;
use cli::{Cli, Options};
use env_logger::{Builder, Env, Target};

fn main() {
    setup_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --version reports success; help and every argument problem
            // share the usage-error exit code
            if e.kind() == ErrorKind::DisplayVersion {
                print!("{e}");
                std::process::exit(0);
            }
            eprint!("{e}");
            std::process::exit(2);
        }
    };

    let opts = Options::from_cli(cli);
    std::process::exit(app::run(opts));
}

fn setup_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });
    builder.target(Target::Stderr);
    let _ = builder.try_init();
}

use clap::Parser;
use engine::{FileStore, Tracker};

mod cli;
mod commands;
mod error;
mod settings;

use crate::{cli::Command, error::Result};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let settings = settings::Settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dividi={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("using data directory {}", settings.data_dir);
    let mut tracker = Tracker::builder()
        .storage(FileStore::new(&settings.data_dir))
        .build();

    commands::run(&mut tracker, cli.command.unwrap_or(Command::Show))
}

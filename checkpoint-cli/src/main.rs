use std::{path::PathBuf, process::ExitCode};

use checkpoint_lib::{Error, Repository, repository::config::CoreConfig};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod game;
mod import;
mod report;

#[derive(Parser, Debug)]
#[command(name = "checkpoint")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use this database instead of the configured one
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on games
    #[command(subcommand)]
    Game(game::Command),
    /// Import games from a `id|name|platform|status|priority|ownership` file
    Import(import::Args),
    /// Show backlog stats and the games to tackle next
    Report(report::Args),
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not set up logging: {err}");
    }

    let cli = Cli::parse();

    let result = open(cli.database).and_then(|repo| match &cli.command {
        Command::Game(cmd) => game::handle(&repo, cmd),
        Command::Import(args) => import::handle(&repo, args),
        Command::Report(args) => report::handle(&repo, args),
    });

    match result {
        Ok(message) => {
            println!("{}", message.green());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            exit_code(&err).into()
        }
    }
}

fn open(database: Option<PathBuf>) -> checkpoint_lib::Result<Repository> {
    let mut cfg = CoreConfig::load()?;
    if let Some(path) = database {
        cfg.set_database_path(path);
    }
    Repository::with_config(cfg)
}

fn exit_code(err: &Error) -> sysexits::ExitCode {
    match err {
        Error::Validation { .. } | Error::DuplicateId(_) | Error::UnknownField(_) => {
            sysexits::ExitCode::DataErr
        }
        Error::NotFound(_) | Error::SourceNotFound(_) => sysexits::ExitCode::NoInput,
        Error::ConfigWrite(_) => sysexits::ExitCode::Config,
        Error::Storage(_) | Error::Io(_) => sysexits::ExitCode::IoErr,
    }
}

use std::path::PathBuf;

use checkpoint_lib::{Repository, Result};

#[derive(clap::Args, Debug, Clone)]
pub struct Args {
    /// UTF-8 text file with one game per line
    file: PathBuf,
}

pub fn handle(repo: &Repository, args: &Args) -> Result<String> {
    Ok(repo.import_from_file(&args.file)?.to_string())
}

use checkpoint_lib::{Repository, Result};

#[derive(clap::Args, Debug, Clone)]
pub struct Args {
    /// How many games to list. Defaults to `report_top` from the configuration
    #[arg(short, long)]
    top: Option<usize>,
}

pub fn handle(repo: &Repository, args: &Args) -> Result<String> {
    let top = args.top.unwrap_or_else(|| repo.config().read().report_top());
    Ok(repo.backlog_report(top).to_string())
}

use checkpoint_lib::{Game, Repository, Result};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List games
    List,
    /// Show a single game
    Show { id: u32 },
    /// Add a new game
    Add {
        id: String,
        name: String,
        platform: String,
        /// UNPLAYED, PLAYING or BEATEN
        status: String,
        /// 1 (low) to 5 (high)
        priority: String,
        /// PHYSICAL or DIGITAL
        ownership: String,
    },
    /// Remove a game
    Remove { id: u32 },
    /// Change one field of a game
    Update {
        id: u32,
        /// id, name, platform, status, priority or ownership
        field: String,
        value: String,
    },
}

pub fn handle(repo: &Repository, cmd: &Command) -> Result<String> {
    match cmd {
        Command::List => {
            let games = repo.list_all();
            if games.is_empty() {
                return Ok("No games loaded yet.".into());
            }
            Ok(games
                .iter()
                .map(Game::to_string)
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Show { id } => repo
            .find_by_id(*id)
            .map(|game| game.to_string())
            .ok_or(checkpoint_lib::Error::NotFound(*id)),
        Command::Add {
            id,
            name,
            platform,
            status,
            priority,
            ownership,
        } => {
            let game = Game::parse(id, name, platform, status, priority, ownership)?;
            let game = repo.add(game)?;
            Ok(format!("Added:\n{game}"))
        }
        Command::Remove { id } => {
            repo.remove(*id)?;
            Ok(format!("Removed id {id}."))
        }
        Command::Update { id, field, value } => {
            let game = repo.update_field(*id, field, value)?;
            Ok(format!("Updated {field}:\n{game}"))
        }
    }
}

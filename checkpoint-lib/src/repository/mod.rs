use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    Error, Result,
    repository::{
        config::{Cfg, CoreConfig},
        db::Db,
        import::parse_batch,
    },
};

mod db;

pub mod config;
pub mod entities;
pub mod import;
pub mod report;

pub use entities::{Field, Game, Ownership, Status};
pub use import::ImportSummary;
pub use report::{BacklogReport, RankedGame, score_for};

/// Central access point for the backlog.
///
/// The [`Repository`] owns both the SQLite table and an in-memory snapshot of it, and keeps the
/// two identical: every mutation is written to the database first and only applied to the
/// snapshot once that write succeeded. Mutations hold the snapshot's write lock for their whole
/// duration, so they never interleave, while readers always observe a consistent snapshot.
#[derive(Clone, Debug)]
pub struct Repository {
    db: Db,
    /// Ordered by id on load, new games are appended
    games: Arc<RwLock<Vec<Game>>>,
    /// Ids of stored rows that failed validation on load. They stay in the table, so their
    /// ids can't be handed out again.
    unreadable: Arc<HashSet<u32>>,
    cfg: Cfg,
}

impl Repository {
    /// Open the database named in the user's configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(CoreConfig::load()?)
    }

    /// Open the database at `path`, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut cfg = CoreConfig::default();
        cfg.set_database_path(path.into());
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: CoreConfig) -> Result<Self> {
        let path = cfg.database_path()?;
        let db = Db::open(&path)?;
        let repo = Self::load(db, cfg)?;

        info!("Opened {} with {} game(s)", path.display(), repo.len());

        Ok(repo)
    }

    fn load(db: Db, cfg: CoreConfig) -> Result<Self> {
        let loaded = db.load_all()?;
        Ok(Self {
            db,
            games: Arc::new(RwLock::new(loaded.games)),
            unreadable: Arc::new(loaded.unreadable),
            cfg: Arc::new(RwLock::new(cfg)),
        })
    }

    pub fn config(&self) -> &Cfg {
        &self.cfg
    }

    /// A copy of every game currently in the backlog.
    pub fn list_all(&self) -> Vec<Game> {
        self.games.read().clone()
    }

    pub fn find_by_id(&self, id: u32) -> Option<Game> {
        self.games.read().iter().find(|g| g.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }

    /// Insert a new [`Game`]. Its id must not be in use.
    pub fn add(&self, game: Game) -> Result<Game> {
        let mut games = self.games.write();
        if self.is_taken(&games, game.id()) {
            return Err(Error::DuplicateId(game.id()));
        }

        self.db.insert(&game)?;
        games.push(game.clone());

        debug!("Added game: {game}");

        Ok(game)
    }

    /// Remove the game with the given id, returning it.
    pub fn remove(&self, id: u32) -> Result<Game> {
        let mut games = self.games.write();
        let index = position(&games, id)?;

        self.db.delete(id)?;
        let game = games.remove(index);

        debug!("Removed game: {game}");

        Ok(game)
    }

    /// Change a single field of a game, given the field's name and the new value as text.
    ///
    /// `status` and `ownership` are matched case-insensitively. Changing `id` moves the game to
    /// the new id, which must be unused; the game then sorts as if it had just been added.
    /// Nothing changes unless the whole update succeeds.
    pub fn update_field(&self, id: u32, field: &str, value: &str) -> Result<Game> {
        let mut games = self.games.write();
        let index = position(&games, id)?;
        let field = Field::parse(field)?;

        let slot = games.get_mut(index).ok_or(Error::NotFound(id))?;
        let mut updated = slot.clone();
        updated.apply(field, value)?;

        if field != Field::Id {
            self.db.update_column(&updated, field)?;
            *slot = updated.clone();
        } else if updated.id() != id {
            let new_id = updated.id();
            if self.is_taken(&games, new_id) {
                return Err(Error::DuplicateId(new_id));
            }

            self.db.replace(id, &updated)?;
            games.remove(index);
            games.push(updated.clone());
        }

        debug!("Updated {field} of game #{id}: {updated}");

        Ok(updated)
    }

    /// Import games from a pipe delimited file. See [`import`] for the format.
    ///
    /// Bad or duplicate lines are skipped. The remaining games are stored in one transaction;
    /// if it fails, nothing is imported.
    pub fn import_from_file(&self, path: &Path) -> Result<ImportSummary> {
        if !path.exists() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);

        let mut games = self.games.write();
        let existing: HashSet<u32> = games
            .iter()
            .map(Game::id)
            .chain(self.unreadable.iter().copied())
            .collect();
        let batch = parse_batch(reader, &existing)?;

        self.db.insert_batch(&batch.accepted)?;

        let added = batch.accepted.len();
        games.extend(batch.accepted);

        let summary = ImportSummary {
            added,
            skipped: batch.skipped,
            total: games.len(),
        };
        info!("Imported {}: {summary}", path.display());

        Ok(summary)
    }

    fn is_taken(&self, games: &[Game], id: u32) -> bool {
        self.unreadable.contains(&id) || games.iter().any(|g| g.id() == id)
    }

    /// Summarize the backlog and list the `top_n` most urgent games.
    pub fn backlog_report(&self, top_n: usize) -> BacklogReport {
        BacklogReport::new(&self.games.read(), top_n)
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory database and configuration.
    pub(crate) fn mock() -> Self {
        Self::load(Db::in_memory(), CoreConfig::mock()).unwrap()
    }
}

fn position(games: &[Game], id: u32) -> Result<usize> {
    games
        .iter()
        .position(|g| g.id() == id)
        .ok_or(Error::NotFound(id))
}

use std::{collections::HashSet, fs, path::Path, sync::Arc};

use derive_more::Deref;
use parking_lot::Mutex;
use rusqlite::{Connection, params, types::Value};
use tracing::{debug, warn};

use crate::{
    Result,
    repository::{
        db::models::GameRow,
        entities::{Field, Game},
    },
};

pub(crate) mod models;

/// Contents of the `games` table.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Loaded {
    pub games: Vec<Game>,
    /// Ids of rows that exist but failed validation
    pub unreadable: HashSet<u32>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS games(
  id        INTEGER PRIMARY KEY,
  name      TEXT NOT NULL,
  platform  TEXT NOT NULL,
  status    TEXT NOT NULL CHECK (status IN ('UNPLAYED','PLAYING','BEATEN')),
  priority  INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 5),
  ownership TEXT NOT NULL CHECK (ownership IN ('PHYSICAL','DIGITAL'))
);
";

const INSERT: &str =
    "INSERT INTO games(id, name, platform, status, priority, ownership) VALUES(?1, ?2, ?3, ?4, ?5, ?6)";

/// Shared handle to the SQLite database holding the `games` table.
///
/// Every write runs in its own transaction that is committed before the call returns.
#[derive(Debug, Clone, Deref)]
pub(crate) struct Db {
    #[deref]
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let db = Self {
            conn: Arc::new(Mutex::new(Connection::open(path)?)),
        };
        db.init()?;

        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.lock().execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read every row ordered by id. Rows that cannot be turned into a valid [`Game`] are
    /// logged and left out of the games, but their ids are kept since the rows still occupy
    /// them.
    pub fn load_all(&self) -> Result<Loaded> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, platform, status, priority, ownership FROM games ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], GameRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut loaded = Loaded::default();
        for row in rows {
            let id = row.id;
            match row.into_game() {
                Ok(game) => loaded.games.push(game),
                Err(err) => {
                    warn!("Skipping stored game #{id}: {err}");
                    // Ids outside the u32 range can never clash with a valid game
                    if let Ok(id) = u32::try_from(id) {
                        loaded.unreadable.insert(id);
                    }
                }
            }
        }

        Ok(loaded)
    }

    pub fn insert(&self, game: &Game) -> Result<()> {
        self.insert_batch(std::slice::from_ref(game))
    }

    /// Insert all `games` in a single transaction. Either every row is written or none is.
    pub fn insert_batch(&self, games: &[Game]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT)?;
            for game in games {
                stmt.execute(params![
                    game.id(),
                    game.name(),
                    game.platform(),
                    <&str>::from(game.status()),
                    game.priority(),
                    <&str>::from(game.ownership()),
                ])?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} row(s)", games.len());

        Ok(())
    }

    pub fn delete(&self, id: u32) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM games WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(())
    }

    /// Write the value `game` holds for `field` into the row with the same id.
    pub fn update_column(&self, game: &Game, field: Field) -> Result<()> {
        let value = match field {
            Field::Id => Value::Integer(i64::from(game.id())),
            Field::Name => Value::Text(game.name().to_string()),
            Field::Platform => Value::Text(game.platform().to_string()),
            Field::Status => Value::Text(game.status().to_string()),
            Field::Priority => Value::Integer(i64::from(game.priority())),
            Field::Ownership => Value::Text(game.ownership().to_string()),
        };
        // Column names are the snake_case field names
        let column: &'static str = field.into();

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            &format!("UPDATE games SET {column} = ?1 WHERE id = ?2"),
            params![value, game.id()],
        )?;
        tx.commit()?;

        Ok(())
    }

    /// Move the row stored under `old_id` to `game.id()`.
    ///
    /// The primary key is never rewritten in place: the old row is deleted and the new one
    /// inserted inside one transaction.
    pub fn replace(&self, old_id: u32, game: &Game) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM games WHERE id = ?1", params![old_id])?;
        tx.execute(
            INSERT,
            params![
                game.id(),
                game.name(),
                game.platform(),
                <&str>::from(game.status()),
                game.priority(),
                <&str>::from(game.ownership()),
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    /// Create a memory backed database for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        let db = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
        };

        db.init().unwrap();

        db
    }

    /// Make every subsequent write to `games` fail, simulating a storage outage.
    #[cfg(test)]
    pub(crate) fn fail_writes(&self) {
        self.lock()
            .execute_batch(
                "CREATE TRIGGER fail_insert BEFORE INSERT ON games BEGIN SELECT RAISE(ABORT, 'disk on fire'); END;
                 CREATE TRIGGER fail_update BEFORE UPDATE ON games BEGIN SELECT RAISE(ABORT, 'disk on fire'); END;
                 CREATE TRIGGER fail_delete BEFORE DELETE ON games BEGIN SELECT RAISE(ABORT, 'disk on fire'); END;",
            )
            .unwrap();
    }

    /// Execute raw SQL, bypassing validation. Used to plant corrupt rows in tests.
    #[cfg(test)]
    pub(crate) fn exec_raw(&self, sql: &str) {
        self.lock().execute_batch(sql).unwrap();
    }
}

use std::str::FromStr;

use rusqlite::Row;
use tracing::warn;

use crate::{
    Error, Result,
    repository::entities::{Game, Ownership, Status},
};

/// A `games` row exactly as it is stored, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GameRow {
    pub id: i64,
    pub name: Option<String>,
    pub platform: Option<String>,
    pub status: Option<String>,
    pub priority: i64,
    pub ownership: Option<String>,
}

impl GameRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            platform: row.get("platform")?,
            status: row.get("status")?,
            priority: row.get("priority")?,
            ownership: row.get("ownership")?,
        })
    }

    /// Turn the stored values into a validated [`Game`], normalizing unknown enum values.
    pub fn into_game(self) -> Result<Game> {
        let id = u32::try_from(self.id)
            .map_err(|_| Error::validation("id", format!("{} is out of range", self.id)))?;
        let priority = u8::try_from(self.priority).map_err(|_| {
            Error::validation("priority", format!("{} is out of range", self.priority))
        })?;

        Game::new(
            id,
            self.name.as_deref().unwrap_or_default(),
            self.platform.as_deref().unwrap_or_default(),
            normalize_status(id, self.status.as_deref()),
            priority,
            normalize_ownership(id, self.ownership.as_deref()),
        )
    }
}

/// Map a stored status onto [`Status`]. Anything unrecognized becomes [`Status::Unplayed`].
pub(crate) fn normalize_status(id: u32, raw: Option<&str>) -> Status {
    match raw.map(|s| Status::from_str(s.trim())) {
        Some(Ok(status)) => status,
        _ => {
            warn!("Game #{id} has unknown status {raw:?}, treating it as {}", Status::Unplayed);
            Status::Unplayed
        }
    }
}

/// Map a stored ownership onto [`Ownership`]. Anything unrecognized becomes
/// [`Ownership::Digital`].
pub(crate) fn normalize_ownership(id: u32, raw: Option<&str>) -> Ownership {
    match raw.map(|s| Ownership::from_str(s.trim())) {
        Some(Ok(ownership)) => ownership,
        _ => {
            warn!(
                "Game #{id} has unknown ownership {raw:?}, treating it as {}",
                Ownership::Digital
            );
            Ownership::Digital
        }
    }
}

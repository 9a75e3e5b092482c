//! Bulk import of games from pipe delimited text.
//!
//! An import runs in two separate stages. [`parse_batch`] filters the source line by line,
//! silently skipping anything malformed or duplicated. The accepted rows are then committed
//! together by [`Repository::import_from_file`](crate::Repository::import_from_file): if that
//! commit fails, none of them are kept.

use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    io::BufRead,
};

use tracing::debug;

use crate::{Result, repository::entities::Game};

const FIELD_COUNT: usize = 6;

/// The games accepted from an import source, plus how many lines were rejected.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Batch {
    pub accepted: Vec<Game>,
    pub skipped: usize,
}

/// Outcome of a finished import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
    /// Size of the backlog after the import
    pub total: usize,
}

impl Display for ImportSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Import complete. Added: {}, Skipped: {}, Total now: {}",
            self.added, self.skipped, self.total
        )
    }
}

/// Read `id|name|platform|status|priority|ownership` lines from `reader`.
///
/// Blank lines and lines starting with `#` are ignored. A line is skipped when it does not have
/// exactly six fields, when any field fails validation, or when its id is already in
/// `existing_ids` or was accepted earlier in the same source. Only a failure to read from
/// `reader` is an error.
pub fn parse_batch<R: BufRead>(reader: R, existing_ids: &HashSet<u32>) -> Result<Batch> {
    let mut batch = Batch::default();
    let mut seen = existing_ids.clone();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(&line) {
            Ok(game) if seen.insert(game.id()) => batch.accepted.push(game),
            Ok(game) => {
                debug!("Skipping line {line_no}: duplicate id {}", game.id());
                batch.skipped += 1;
            }
            Err(reason) => {
                debug!("Skipping line {line_no}: {reason}");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

fn parse_line(line: &str) -> std::result::Result<Game, String> {
    let parts: Vec<&str> = line.split('|').collect();
    let [id, name, platform, status, priority, ownership] = parts.as_slice() else {
        return Err(format!("expected {FIELD_COUNT} fields, found {}", parts.len()));
    };

    Game::parse(id, name, platform, status, priority, ownership).map_err(|err| err.to_string())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;
    use crate::repository::entities::{Ownership, Status};

    fn parse(source: &str, existing: &[u32]) -> Batch {
        let existing = existing.iter().copied().collect();
        parse_batch(Cursor::new(source), &existing).unwrap()
    }

    #[test]
    fn test_parse_batch() {
        let batch = parse(
            "1|Hades II|PC|UNPLAYED|5|DIGITAL\n\
             2|Spider-Man 2|PS5|PLAYING|4|PHYSICAL\n\
             2|Dup|PS5|PLAYING|4|PHYSICAL\n\
             bad|line|oops\n",
            &[],
        );

        assert_eq!(batch.skipped, 2);
        let ids: Vec<u32> = batch.accepted.iter().map(Game::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ignores_blank_and_comment_lines() {
        let batch = parse(
            "# id|name|platform|status|priority|ownership\n\n   \n  # indented comment\n\
             3|Celeste|Switch|beaten|2|physical\n",
            &[],
        );

        assert_eq!(batch.skipped, 0);
        let game = batch.accepted.first().unwrap();
        assert_eq!(game.status(), Status::Beaten);
        assert_eq!(game.ownership(), Ownership::Physical);
    }

    #[test]
    fn test_trims_fields() {
        let batch = parse(" 4 |  Outer Wilds | PC | Unplayed | 3 | Digital ", &[]);

        let game = batch.accepted.first().unwrap();
        assert_eq!(game.id(), 4);
        assert_eq!(game.name(), "Outer Wilds");
        assert_eq!(game.platform(), "PC");
    }

    #[test]
    fn test_skips_invalid_rows() {
        let batch = parse(
            "0|Zero|PC|UNPLAYED|3|DIGITAL\n\
             5|  |PC|UNPLAYED|3|DIGITAL\n\
             6|Six|PC|ABANDONED|3|DIGITAL\n\
             7|Seven|PC|UNPLAYED|9|DIGITAL\n\
             8|Eight|PC|UNPLAYED|3|GAME PASS\n\
             9|Nine|PC|UNPLAYED|3|DIGITAL|extra\n",
            &[],
        );

        assert!(batch.accepted.is_empty());
        assert_eq!(batch.skipped, 6);
    }

    #[test]
    fn test_skips_existing_ids() {
        let batch = parse(
            "1|Hades II|PC|UNPLAYED|5|DIGITAL\n2|Spider-Man 2|PS5|PLAYING|4|PHYSICAL\n",
            &[1],
        );

        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.accepted.len(), 1);
    }

    #[test]
    fn test_unreadable_source() {
        let existing = HashSet::new();
        let invalid_utf8 = Cursor::new(vec![b'1', b'|', 0xff, 0xfe, b'\n']);

        assert!(parse_batch(invalid_utf8, &existing).is_err());
    }

    #[test]
    fn test_summary_display() {
        let summary = ImportSummary {
            added: 2,
            skipped: 2,
            total: 2,
        };

        assert_eq!(
            summary.to_string(),
            "Import complete. Added: 2, Skipped: 2, Total now: 2"
        );
    }
}

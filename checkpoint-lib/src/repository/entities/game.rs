use std::{
    fmt::{self, Formatter},
    str::FromStr,
};

use getset::CopyGetters;
use strum::{Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// High-level progress for a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Status {
    Unplayed,
    Playing,
    Beaten,
}

/// How a game is owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Ownership {
    Physical,
    Digital,
}

/// A column of a [`Game`] that can be changed through
/// [`Repository::update_field`](crate::Repository::update_field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Field {
    Id,
    Name,
    Platform,
    Status,
    Priority,
    Ownership,
}

impl Field {
    /// Resolve a user supplied field name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name.trim()).map_err(|_| Error::UnknownField(name.to_string()))
    }
}

/// A single backlog record.
///
/// Every setter validates its input, so a [`Game`] can never hold an invalid value. Construction
/// goes through the same setters; if any of them fails the half-built value is dropped.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct Game {
    #[getset(get_copy = "pub")]
    id: u32,
    name: String,
    platform: String,
    #[getset(get_copy = "pub")]
    status: Status,
    /// 1 (low urgency) to 5 (high urgency)
    #[getset(get_copy = "pub")]
    priority: u8,
    #[getset(get_copy = "pub")]
    ownership: Ownership,
}

impl Game {
    pub fn new(
        id: u32,
        name: &str,
        platform: &str,
        status: Status,
        priority: u8,
        ownership: Ownership,
    ) -> Result<Self> {
        let mut game = Self {
            id: 0,
            name: String::new(),
            platform: String::new(),
            status,
            priority: MIN_PRIORITY,
            ownership,
        };

        game.set_id(id)?;
        game.set_name(name)?;
        game.set_platform(platform)?;
        game.set_priority(priority)?;

        Ok(game)
    }

    /// Build a [`Game`] from raw text, as typed by a user or read from an import file.
    ///
    /// Every value is trimmed. `status` and `ownership` are matched case-insensitively.
    pub fn parse(
        id: &str,
        name: &str,
        platform: &str,
        status: &str,
        priority: &str,
        ownership: &str,
    ) -> Result<Self> {
        Self::new(
            parse_id(id)?,
            name,
            platform,
            parse_status(status)?,
            parse_priority(priority)?,
            parse_ownership(ownership)?,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn set_id(&mut self, id: u32) -> Result<()> {
        if id == 0 {
            return Err(Error::validation("id", "id MUST be > 0"));
        }
        self.id = id;
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = required("name", name)?;
        Ok(())
    }

    pub fn set_platform(&mut self, platform: &str) -> Result<()> {
        self.platform = required("platform", platform)?;
        Ok(())
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn set_priority(&mut self, priority: u8) -> Result<()> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(Error::validation(
                "priority",
                format!("priority MUST be {MIN_PRIORITY}-{MAX_PRIORITY}"),
            ));
        }
        self.priority = priority;
        Ok(())
    }

    pub fn set_ownership(&mut self, ownership: Ownership) {
        self.ownership = ownership;
    }

    /// Apply a raw textual value to one field. On error `self` is left as it was.
    pub(crate) fn apply(&mut self, field: Field, value: &str) -> Result<()> {
        match field {
            Field::Id => self.set_id(parse_id(value)?),
            Field::Name => self.set_name(value),
            Field::Platform => self.set_platform(value),
            Field::Status => {
                self.set_status(parse_status(value)?);
                Ok(())
            }
            Field::Priority => self.set_priority(parse_priority(value)?),
            Field::Ownership => {
                self.set_ownership(parse_ownership(value)?);
                Ok(())
            }
        }
    }

    /// How urgently this game should be played next.
    ///
    /// See [`score_for`](crate::repository::report::score_for).
    pub fn score(&self) -> u32 {
        crate::repository::report::score_for(self)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} | {} | {} | {} | P{} | {}",
            self.id, self.name, self.platform, self.status, self.priority, self.ownership
        )
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, format!("{field} required")));
    }
    Ok(value.to_string())
}

fn parse_id(value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation("id", format!("'{}' is not a valid id", value.trim())))
}

fn parse_priority(value: &str) -> Result<u8> {
    value.trim().parse().map_err(|_| {
        Error::validation(
            "priority",
            format!("'{}' is not a number between {MIN_PRIORITY} and {MAX_PRIORITY}", value.trim()),
        )
    })
}

fn parse_status(value: &str) -> Result<Status> {
    Status::from_str(value.trim())
        .map_err(|_| Error::validation("status", format!("'{}' is not a status", value.trim())))
}

fn parse_ownership(value: &str) -> Result<Ownership> {
    Ownership::from_str(value.trim()).map_err(|_| {
        Error::validation("ownership", format!("'{}' is not an ownership type", value.trim()))
    })
}

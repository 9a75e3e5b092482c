//! Backlog scoring and the summary report built from it.

use std::fmt::{self, Display, Formatter};

use crate::repository::entities::{Game, Status};

/// Urgency of a game: `priority * 2` plus a bonus for how far it is from being finished.
pub fn score_for(game: &Game) -> u32 {
    let status_weight = match game.status() {
        Status::Unplayed => 3,
        Status::Playing => 1,
        Status::Beaten => 0,
    };

    u32::from(game.priority()) * 2 + status_weight
}

/// Order `games` from most to least urgent. Games with equal scores keep their relative order.
pub fn rank(games: &[Game]) -> Vec<&Game> {
    let mut ranked: Vec<&Game> = games.iter().collect();
    // `sort_by` is stable
    ranked.sort_by(|a, b| score_for(b).cmp(&score_for(a)));
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGame {
    /// 1-based position in the ranking
    pub rank: usize,
    pub id: u32,
    pub name: String,
    pub score: u32,
}

/// Summary of the backlog, rendered through [`Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacklogReport {
    /// There are no games to report on.
    Empty,
    Health {
        total: usize,
        unplayed: usize,
        playing: usize,
        beaten: usize,
        top: Vec<RankedGame>,
    },
}

impl BacklogReport {
    /// Build a report for `games`, listing the `top_n` most urgent ones. `top_n` is clamped to
    /// at least one and at most the number of games.
    pub fn new(games: &[Game], top_n: usize) -> Self {
        if games.is_empty() {
            return Self::Empty;
        }

        let count = |status| games.iter().filter(|g| g.status() == status).count();
        let top_n = top_n.clamp(1, games.len());

        let top = rank(games)
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(i, game)| RankedGame {
                rank: i + 1,
                id: game.id(),
                name: game.name().to_string(),
                score: score_for(game),
            })
            .collect();

        Self::Health {
            total: games.len(),
            unplayed: count(Status::Unplayed),
            playing: count(Status::Playing),
            beaten: count(Status::Beaten),
            top,
        }
    }
}

impl Display for BacklogReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "No games loaded yet."),
            Self::Health {
                total,
                unplayed,
                playing,
                beaten,
                top,
            } => {
                writeln!(f, "Backlog Health")?;
                writeln!(
                    f,
                    "Total: {total} | Unplayed: {unplayed} | Playing: {playing} | Beaten: {beaten}"
                )?;
                writeln!(f)?;
                writeln!(f, "Top {} To Tackle Next:", top.len())?;
                for entry in top {
                    writeln!(
                        f,
                        "{}) [{}] {} (score={})",
                        entry.rank, entry.id, entry.name, entry.score
                    )?;
                }
                Ok(())
            }
        }
    }
}

//! Data structures for the competition engine: teams, matches, tables, state.

mod competition;
mod fixture;
mod team;

pub use competition::{
    Competition, CompetitionConfig, CompetitionError, CompetitionId, CompetitionType, CupFormat,
    NewsItem, Snapshot,
};
pub use fixture::{FormResult, KnockoutStage, Match, MatchId, MatchKind, Score, TableRow, TieLeg};
pub use team::{GroupLabel, Team, TeamId};

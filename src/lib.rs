//! Football competition simulator: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_event, bracket_from_groups, build_ties, compose_groups, evaluate_transition,
    group_qualifiers, group_table, knockout_draw, league_fixtures, next_knockout_round, rank_order,
    round_robin, simulate_round, stage_for_size, stage_winners, start_competition, table,
    validate_config, CompetitionEvent, ProvidedScore, Qualifier, RoundHeadline, RoundResults,
};
pub use models::{
    Competition, CompetitionConfig, CompetitionError, CompetitionId, CompetitionType, CupFormat,
    FormResult, GroupLabel, KnockoutStage, Match, MatchId, MatchKind, NewsItem, Score, Snapshot,
    TableRow, Team, TeamId, TieLeg,
};

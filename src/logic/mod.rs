//! Competition business logic: fixtures, groups, standings, knockout, transitions.

mod fixtures;
mod groups;
mod knockout;
mod setup;
mod simulation;
mod standings;
mod transition;

pub use fixtures::{league_fixtures, round_robin};
pub use groups::compose_groups;
pub use knockout::{
    bracket_from_groups, build_ties, group_qualifiers, knockout_draw, next_knockout_round,
    stage_for_size, stage_winners, Qualifier,
};
pub use setup::{start_competition, validate_config};
pub use simulation::{simulate_round, ProvidedScore, RoundHeadline, RoundResults};
pub use standings::{group_table, rank_order, table};
pub use transition::{apply_event, evaluate_transition, CompetitionEvent};

//! Knockout brackets: the random draw, seeding from groups, and
//! progression between stages with aggregate/penalty resolution.

use crate::logic::standings::group_table;
use crate::models::{
    CompetitionError, GroupLabel, KnockoutStage, Match, Team, TeamId, TieLeg,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Stage name for a field of `n` surviving teams. Shared by the draw,
/// the group-seeded bracket, and progression, so the stage is always
/// derived from the participant count.
pub fn stage_for_size(n: usize) -> Result<KnockoutStage, CompetitionError> {
    match n {
        32 => Ok(KnockoutStage::R32),
        16 => Ok(KnockoutStage::R16),
        8 => Ok(KnockoutStage::QuarterFinal),
        4 => Ok(KnockoutStage::SemiFinal),
        2 => Ok(KnockoutStage::Final),
        _ => Err(CompetitionError::UnsupportedBracketSize(n)),
    }
}

/// Open a straight knockout cup with a random draw: shuffle, then pair
/// adjacent teams. Fixtures start at `first_round`.
pub fn knockout_draw(
    teams: &[Team],
    first_round: u32,
    double_leg: bool,
    rng: &mut impl Rng,
) -> Result<Vec<Match>, CompetitionError> {
    let stage = stage_for_size(teams.len())?;
    let mut drawn: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    drawn.shuffle(rng);

    let pairs: Vec<(TeamId, TeamId)> = drawn.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    Ok(build_ties(&pairs, stage, first_round, double_leg))
}

/// A team that advanced from its group, with its origin recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Qualifier {
    pub team_id: TeamId,
    pub group: GroupLabel,
    /// 1-based finishing position within the group.
    pub rank: usize,
}

/// Select the top `advancing_per_group` of every group by the standings
/// tie-break order, in group-label order.
pub fn group_qualifiers(
    teams: &[Team],
    matches: &[Match],
    advancing_per_group: usize,
) -> Vec<Qualifier> {
    let mut labels: Vec<GroupLabel> = teams.iter().filter_map(|t| t.group).collect();
    labels.sort_unstable();
    labels.dedup();

    let mut qualifiers = Vec::new();
    for label in labels {
        // group_table already applies the tie-break ordering.
        let rows = group_table(teams, matches, label);
        for (i, row) in rows.into_iter().take(advancing_per_group).enumerate() {
            qualifiers.push(Qualifier {
                team_id: row.team_id,
                group: label,
                rank: i + 1,
            });
        }
    }
    qualifiers
}

/// Build the first knockout stage from completed groups.
///
/// Qualifiers are flattened in group-then-rank order and paired top
/// half against bottom half (`i` vs `len-1-i`). This spreads group
/// mates apart only as far as that ordering does; it is not a full
/// seeded-bracket avoidance scheme.
pub fn bracket_from_groups(
    teams: &[Team],
    matches: &[Match],
    advancing_per_group: usize,
    next_round: u32,
    double_leg: bool,
) -> Result<Vec<Match>, CompetitionError> {
    let qualifiers = group_qualifiers(teams, matches, advancing_per_group);
    let stage = stage_for_size(qualifiers.len())?;

    let pairs: Vec<(TeamId, TeamId)> = (0..qualifiers.len() / 2)
        .map(|i| {
            (
                qualifiers[i].team_id,
                qualifiers[qualifiers.len() - 1 - i].team_id,
            )
        })
        .collect();
    Ok(build_ties(&pairs, stage, next_round, double_leg))
}

/// Resolve every tie of a completed knockout stage and build the next
/// stage's fixtures, starting at `next_round`.
///
/// `stage_matches` must be all fixtures of the stage, both legs
/// included, in schedule order; winners keep that order and are then
/// paired top half against bottom half. Errors instead of guessing:
/// an unplayed match, a first leg with no second leg, or a level tie
/// with no recorded penalty winner all abort the progression.
pub fn next_knockout_round(
    stage_matches: &[&Match],
    next_round: u32,
    double_leg: bool,
) -> Result<Vec<Match>, CompetitionError> {
    let winners = stage_winners(stage_matches)?;
    let stage = stage_for_size(winners.len())?;

    let pairs: Vec<(TeamId, TeamId)> = (0..winners.len() / 2)
        .map(|i| (winners[i], winners[winners.len() - 1 - i]))
        .collect();
    Ok(build_ties(&pairs, stage, next_round, double_leg))
}

/// Winners of a completed stage, in the order their ties were scheduled.
pub fn stage_winners(stage_matches: &[&Match]) -> Result<Vec<TeamId>, CompetitionError> {
    let mut winners = Vec::new();
    for m in stage_matches {
        match m.tie_leg() {
            Some(TieLeg::Single) => winners.push(single_leg_winner(m)?),
            Some(TieLeg::First) => winners.push(aggregate_winner(m, stage_matches)?),
            // Second legs are resolved through their first leg.
            Some(TieLeg::Second { .. }) => {}
            None => continue,
        }
    }
    Ok(winners)
}

fn single_leg_winner(m: &Match) -> Result<TeamId, CompetitionError> {
    let score = m.score.ok_or(CompetitionError::UnplayedMatch(m.id))?;
    if score.home > score.away {
        Ok(m.home)
    } else if score.away > score.home {
        Ok(m.away)
    } else {
        m.penalty_winner()
            .ok_or(CompetitionError::MissingPenaltyWinner(m.id))
    }
}

/// Two-legged tie: `m` is the first leg. Team A is home in leg 1, so
/// its aggregate is leg1.home + leg2.away; team B's is the reverse.
fn aggregate_winner(m: &Match, stage_matches: &[&Match]) -> Result<TeamId, CompetitionError> {
    let leg2 = stage_matches
        .iter()
        .find(|other| matches!(other.tie_leg(), Some(TieLeg::Second { first_leg }) if first_leg == m.id))
        .ok_or(CompetitionError::MissingSecondLeg(m.id))?;

    let first = m.score.ok_or(CompetitionError::UnplayedMatch(m.id))?;
    let second = leg2.score.ok_or(CompetitionError::UnplayedMatch(leg2.id))?;

    let team_a = first.home + second.away;
    let team_b = first.away + second.home;
    if team_a > team_b {
        Ok(m.home)
    } else if team_b > team_a {
        Ok(m.away)
    } else {
        leg2.penalty_winner()
            .ok_or(CompetitionError::MissingPenaltyWinner(leg2.id))
    }
}

/// Materialize fixtures for a list of pairings. Double-leg ties get a
/// second leg one round later with home/away swapped and a back
/// reference to the first leg. The final is always a single leg, no
/// matter the configuration.
pub fn build_ties(
    pairs: &[(TeamId, TeamId)],
    stage: KnockoutStage,
    first_round: u32,
    double_leg: bool,
) -> Vec<Match> {
    let two_legs = double_leg && stage != KnockoutStage::Final;
    let mut matches = Vec::with_capacity(pairs.len() * if two_legs { 2 } else { 1 });
    let mut second_legs = Vec::new();

    for &(home, away) in pairs {
        if two_legs {
            let first = Match::knockout(first_round, home, away, stage, TieLeg::First);
            second_legs.push(Match::knockout(
                first_round + 1,
                away,
                home,
                stage,
                TieLeg::Second { first_leg: first.id },
            ));
            matches.push(first);
        } else {
            matches.push(Match::knockout(first_round, home, away, stage, TieLeg::Single));
        }
    }

    // All first legs share a round, all second legs the next one.
    matches.append(&mut second_legs);
    matches
}

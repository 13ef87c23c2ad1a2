//! The stage transition controller: a reducer over competition state.
//!
//! Every score update funnels through [`apply_event`], which patches
//! the match in place and then decides whether a completed round means
//! new fixtures (knockout bracket from groups, or the next knockout
//! stage). The round-existence guard makes re-evaluation a no-op, so
//! the controller can run after every single score without duplicating
//! fixtures.

use crate::logic::knockout::{bracket_from_groups, next_knockout_round};
use crate::models::{
    Competition, CompetitionError, CompetitionType, KnockoutStage, Match, MatchId, MatchKind,
    NewsItem, Score, TeamId,
};

/// Inputs the controller reacts to.
#[derive(Clone, Debug)]
pub enum CompetitionEvent {
    /// A result from the score source or a manual edit.
    ScoreSubmitted {
        match_id: MatchId,
        home_score: u32,
        away_score: u32,
        penalty_winner: Option<TeamId>,
        commentary: Option<String>,
    },
    /// Re-run the transition check without changing any score.
    StageAdvanceRequested,
}

/// Apply one event and return whatever fixtures it caused to be
/// appended (empty for most score updates).
///
/// Invariant errors leave the competition untouched apart from the
/// already-patched score: the new stage is built completely before
/// anything is appended.
pub fn apply_event(
    competition: &mut Competition,
    event: CompetitionEvent,
) -> Result<Vec<Match>, CompetitionError> {
    let round = match event {
        CompetitionEvent::ScoreSubmitted {
            match_id,
            home_score,
            away_score,
            penalty_winner,
            commentary,
        } => {
            record_score(
                competition,
                match_id,
                Score::new(home_score, away_score),
                penalty_winner,
                commentary,
            )?;
            // Evaluate for the edited match's round, not the UI pointer:
            // editing a past result must still be able to fire the check.
            match competition.find_match(match_id) {
                Some(m) => m.round,
                None => return Err(CompetitionError::MatchNotFound(match_id)),
            }
        }
        CompetitionEvent::StageAdvanceRequested => competition.last_completed_round(),
    };

    if round == 0 {
        return Ok(Vec::new());
    }

    let generated = evaluate_transition(competition, round)?;
    if generated.is_empty() {
        return Ok(generated);
    }

    if let Some(stage) = generated[0].knockout_stage() {
        log::info!(
            "{}: round {} complete, drew {} ({} fixtures)",
            competition.config.name,
            round,
            stage.label(),
            generated.len()
        );
        let pairings: Vec<String> = generated
            .iter()
            .filter(|m| m.round == generated[0].round)
            .map(|m| {
                format!(
                    "{} vs {}",
                    competition.team_name(m.home),
                    competition.team_name(m.away)
                )
            })
            .collect();
        competition.push_news(NewsItem::new(
            round,
            format!("{} Draw Complete!", stage.label()),
            format!("The {} pairings are set: {}.", stage.label(), pairings.join(", ")),
        ));
    }
    competition.matches.extend(generated.iter().cloned());
    Ok(generated)
}

/// Patch a score (and, for knockout matches, the penalty winner) onto
/// an existing fixture. Structure never changes.
fn record_score(
    competition: &mut Competition,
    match_id: MatchId,
    score: Score,
    penalty_winner: Option<TeamId>,
    commentary: Option<String>,
) -> Result<(), CompetitionError> {
    let m = competition
        .find_match_mut(match_id)
        .ok_or(CompetitionError::MatchNotFound(match_id))?;

    if let Some(winner) = penalty_winner {
        if winner != m.home && winner != m.away {
            return Err(CompetitionError::PenaltyWinnerNotInMatch(match_id));
        }
    }

    m.score = Some(score);
    if let Some(text) = commentary {
        m.commentary = Some(text);
    }
    if let MatchKind::Knockout { penalty_winner: slot, .. } = &mut m.kind {
        // Shootouts only exist in knockout play; a stray penalty winner
        // on a table match is dropped.
        if penalty_winner.is_some() {
            *slot = penalty_winner;
        }
    }
    Ok(())
}

/// The transition rule of the state machine, evaluated for one round.
/// Pure with respect to the competition: returns the fixtures to
/// append, or an empty list when nothing should happen.
pub fn evaluate_transition(
    competition: &Competition,
    round: u32,
) -> Result<Vec<Match>, CompetitionError> {
    if competition.config.format != CompetitionType::Cup || !competition.round_played(round) {
        // Plain league rounds never generate fixtures; the schedule is
        // seeded in full at kick-off.
        return Ok(Vec::new());
    }

    let round_matches = competition.matches_for_round(round);

    if round_matches.iter().any(|m| matches!(m.kind, MatchKind::Group { .. })) {
        return group_stage_transition(competition, round);
    }

    if let Some(stage) = round_matches.iter().find_map(|m| m.knockout_stage()) {
        if stage != KnockoutStage::Final {
            return knockout_transition(competition, stage);
        }
    }

    // Final just completed, or a league-tagged cup round: terminal.
    Ok(Vec::new())
}

/// Groups -> knockout: fires only when the completed round is the last
/// group round anywhere in the schedule and round+1 has no fixtures yet.
fn group_stage_transition(
    competition: &Competition,
    round: u32,
) -> Result<Vec<Match>, CompetitionError> {
    let later_group_rounds = competition
        .matches
        .iter()
        .any(|m| m.round > round && matches!(m.kind, MatchKind::Group { .. }));
    if later_group_rounds {
        return Ok(Vec::new());
    }
    let next_round = round + 1;
    if competition.matches.iter().any(|m| m.round == next_round) {
        // Already generated; re-evaluation is a no-op.
        return Ok(Vec::new());
    }
    bracket_from_groups(
        &competition.teams,
        &competition.matches,
        competition.config.advancing_per_group,
        next_round,
        competition.config.double_leg_playoffs,
    )
}

/// Knockout stage -> next stage: fires only when every fixture of the
/// whole stage (both legs) is played and nothing is scheduled after it.
fn knockout_transition(
    competition: &Competition,
    stage: KnockoutStage,
) -> Result<Vec<Match>, CompetitionError> {
    let stage_matches: Vec<&Match> = competition
        .matches
        .iter()
        .filter(|m| m.knockout_stage() == Some(stage))
        .collect();
    if stage_matches.iter().any(|m| !m.played()) {
        return Ok(Vec::new());
    }

    let stage_end = stage_matches.iter().map(|m| m.round).max().unwrap_or(0);
    if competition.matches.iter().any(|m| m.round > stage_end) {
        // The successor stage already exists; editing an old result
        // must not draw it again.
        return Ok(Vec::new());
    }

    next_knockout_round(
        &stage_matches,
        stage_end + 1,
        competition.config.double_leg_playoffs,
    )
}

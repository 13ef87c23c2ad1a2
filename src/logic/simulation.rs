//! Consuming the score source: apply externally supplied results, or
//! fall back to randomly generated ones, and let the engine settle any
//! penalty shootouts the scores call for.

use crate::logic::transition::{apply_event, CompetitionEvent};
use crate::models::{Competition, CompetitionError, Match, MatchId, TeamId, TieLeg};
use rand::Rng;

/// One result row from the external score source.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ProvidedScore {
    pub match_id: MatchId,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

/// Headline the score source may attach to the round.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoundHeadline {
    pub headline: String,
    pub content: String,
}

/// A full round report from the score source.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoundResults {
    pub scores: Vec<ProvidedScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<RoundHeadline>,
}

/// Play out every unplayed match of the current round.
///
/// `provided = Some(..)` uses the score source's results (rows for
/// other rounds are ignored); `None` is the documented degraded mode
/// and generates random scores instead. Either way the engine decides
/// penalty shootouts itself: a level single-leg knockout score, or a
/// level aggregate on a second leg, draws a random shootout winner.
/// Each applied score runs the stage transition controller; any
/// fixtures that generated are returned.
pub fn simulate_round(
    competition: &mut Competition,
    provided: Option<&RoundResults>,
    rng: &mut impl Rng,
) -> Result<Vec<Match>, CompetitionError> {
    let round = competition.current_round;
    let pending: Vec<MatchId> = competition
        .matches
        .iter()
        .filter(|m| m.round == round && !m.played())
        .map(|m| m.id)
        .collect();

    let mut appended = Vec::new();
    for match_id in pending {
        let supplied = provided.and_then(|r| r.scores.iter().find(|s| s.match_id == match_id));
        let (home_score, away_score, mut commentary) = match supplied {
            Some(s) => (
                s.home_score,
                s.away_score,
                s.commentary.clone().unwrap_or_else(|| "Simulated result.".into()),
            ),
            // Non-authoritative stand-in when the source returns nothing.
            None => (rng.gen_range(0..4), rng.gen_range(0..3), "Simulated result.".into()),
        };

        let penalty_winner = settle_shootout(
            competition,
            match_id,
            home_score,
            away_score,
            &mut commentary,
            rng,
        );

        appended.extend(apply_event(
            competition,
            CompetitionEvent::ScoreSubmitted {
                match_id,
                home_score,
                away_score,
                penalty_winner,
                commentary: Some(commentary),
            },
        )?);
    }

    if let Some(news) = provided.and_then(|r| r.news.as_ref()) {
        competition.push_news(crate::models::NewsItem::new(
            round,
            news.headline.clone(),
            news.content.clone(),
        ));
    }

    Ok(appended)
}

/// Decide a penalty shootout where the new score requires one.
/// Returns the shootout winner, or `None` when the tie has a winner on
/// goals (or is not at a deciding point).
fn settle_shootout(
    competition: &Competition,
    match_id: MatchId,
    home_score: u32,
    away_score: u32,
    commentary: &mut String,
    rng: &mut impl Rng,
) -> Option<TeamId> {
    let m = competition.find_match(match_id)?;
    match m.tie_leg()? {
        TieLeg::Single => {
            if home_score != away_score {
                return None;
            }
            Some(draw_shootout(m.home, m.away, commentary, rng))
        }
        TieLeg::Second { first_leg } => {
            let leg1 = competition.find_match(first_leg)?;
            let first = leg1.score?;
            // Team A was home in leg 1.
            let team_a = first.home + away_score;
            let team_b = first.away + home_score;
            if team_a != team_b {
                return None;
            }
            commentary.push_str(&format!(" (Aggregate {}-{}.)", team_a, team_b));
            Some(draw_shootout(m.home, m.away, commentary, rng))
        }
        TieLeg::First => None,
    }
}

fn draw_shootout(
    home: TeamId,
    away: TeamId,
    commentary: &mut String,
    rng: &mut impl Rng,
) -> TeamId {
    let home_wins = rng.gen_bool(0.5);
    let (home_pens, away_pens) = if home_wins { (5, 4) } else { (4, 5) };
    commentary.push_str(&format!(" (Penalties: {}-{})", home_pens, away_pens));
    if home_wins {
        home
    } else {
        away
    }
}

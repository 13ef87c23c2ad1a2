//! Round-robin fixture generation (circle method).

use crate::models::{CompetitionError, Match, Team, TeamId};

/// Generate a full league schedule for `teams`.
///
/// Circle method: the team at position 0 stays fixed; each round pairs
/// position `i` with position `n-1-i`, then everyone else rotates one
/// place. Every team meets every other team exactly once in `n-1`
/// rounds of `n/2` matches. With `double_round`, a mirrored second leg
/// (home/away swapped) follows with rounds offset by `n-1`.
pub fn league_fixtures(teams: &[Team], double_round: bool) -> Result<Vec<Match>, CompetitionError> {
    let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    round_robin(&ids, double_round, Match::league)
}

/// Pool-level round robin with a caller-supplied fixture constructor,
/// so group play can tag its matches. Rounds are numbered from 1.
///
/// Pools must be even-sized: byes are unsupported.
pub fn round_robin<F>(
    pool: &[TeamId],
    double_round: bool,
    make: F,
) -> Result<Vec<Match>, CompetitionError>
where
    F: Fn(u32, TeamId, TeamId) -> Match,
{
    let n = pool.len();
    if n == 0 || n % 2 != 0 {
        return Err(CompetitionError::OddPool { size: n });
    }

    let rounds_per_leg = n - 1;
    let matches_per_round = n / 2;
    let mut rotation: Vec<TeamId> = pool.to_vec();
    let mut first_leg: Vec<(u32, TeamId, TeamId)> = Vec::with_capacity(rounds_per_leg * matches_per_round);

    for round in 0..rounds_per_leg {
        for slot in 0..matches_per_round {
            let home = rotation[slot];
            let away = rotation[n - 1 - slot];
            first_leg.push((round as u32 + 1, home, away));
        }
        // Rotate everyone except position 0: last element moves to position 1.
        if let Some(last) = rotation.pop() {
            rotation.insert(1, last);
        }
    }

    let mut matches: Vec<Match> = first_leg
        .iter()
        .map(|&(round, home, away)| make(round, home, away))
        .collect();

    if double_round {
        matches.extend(
            first_leg
                .iter()
                .map(|&(round, home, away)| make(round + rounds_per_leg as u32, away, home)),
        );
    }

    matches.sort_by_key(|m| m.round);
    Ok(matches)
}

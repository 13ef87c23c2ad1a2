//! Group stage composition: partition teams into groups and round-robin each.

use crate::logic::fixtures::round_robin;
use crate::models::{CompetitionError, GroupLabel, Match, Team, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;

const GROUP_LABELS: [GroupLabel; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Randomly partition `teams` into `group_count` groups, label them
/// alphabetically, and generate a round robin per group.
///
/// Returns the combined group fixtures (sorted by round) and the
/// roster with group labels assigned. The shuffle is the only
/// nondeterminism; pass a seeded RNG for reproducible draws.
pub fn compose_groups(
    teams: &[Team],
    group_count: usize,
    double_round: bool,
    rng: &mut impl Rng,
) -> Result<(Vec<Match>, Vec<Team>), CompetitionError> {
    if group_count == 0 || group_count > GROUP_LABELS.len() || teams.len() % group_count != 0 {
        return Err(CompetitionError::GroupCountMismatch {
            teams: teams.len(),
            groups: group_count,
        });
    }

    let mut shuffled: Vec<Team> = teams.to_vec();
    shuffled.shuffle(rng);

    // Exact division was checked above.
    let per_group = teams.len() / group_count;
    let mut matches: Vec<Match> = Vec::new();
    let mut labeled: Vec<Team> = Vec::with_capacity(teams.len());

    for (g, chunk) in shuffled.chunks(per_group).enumerate() {
        let label = GROUP_LABELS[g];
        let pool: Vec<TeamId> = chunk.iter().map(|t| t.id).collect();
        matches.extend(round_robin(&pool, double_round, |round, home, away| {
            Match::group(round, home, away, label)
        })?);
        labeled.extend(chunk.iter().cloned().map(|mut t| {
            t.group = Some(label);
            t
        }));
    }

    matches.sort_by_key(|m| m.round);
    Ok((matches, labeled))
}

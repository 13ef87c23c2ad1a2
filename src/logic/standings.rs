//! Standings calculation and the tie-break ordering.

use crate::models::{FormResult, GroupLabel, Match, Score, TableRow, Team};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Window of recent results kept per team.
const FORM_LENGTH: usize = 5;

/// Compute the standings table for `teams` over `matches`.
///
/// Only played league and group-stage matches count; knockout results
/// never affect the table. Rows come back sorted by [`rank_order`].
pub fn table(teams: &[Team], matches: &[Match]) -> Vec<TableRow> {
    let mut rows: HashMap<_, TableRow> = teams
        .iter()
        .map(|t| (t.id, TableRow::new(t.id)))
        .collect();

    for m in matches {
        let score = match m.score {
            Some(s) if m.counts_for_table() => s,
            _ => continue,
        };
        // Skip matches referencing teams outside the roster slice
        // (e.g. one group's table computed over the full fixture list).
        if !rows.contains_key(&m.home) || !rows.contains_key(&m.away) {
            continue;
        }

        let (home_form, away_form) = match score.home.cmp(&score.away) {
            Ordering::Greater => (FormResult::W, FormResult::L),
            Ordering::Less => (FormResult::L, FormResult::W),
            Ordering::Equal => (FormResult::D, FormResult::D),
        };
        if let Some(home) = rows.get_mut(&m.home) {
            accumulate(home, score, home_form);
        }
        if let Some(away) = rows.get_mut(&m.away) {
            accumulate(away, score.flipped(), away_form);
        }
    }

    // Stable sort over roster order, so teams the comparator considers
    // equal keep their insertion order.
    let mut sorted: Vec<TableRow> = teams
        .iter()
        .filter_map(|t| rows.remove(&t.id))
        .collect();
    sorted.sort_by(rank_order);
    sorted
}

/// Standings restricted to one group's teams.
pub fn group_table(teams: &[Team], matches: &[Match], group: GroupLabel) -> Vec<TableRow> {
    let members: Vec<Team> = teams
        .iter()
        .filter(|t| t.group == Some(group))
        .cloned()
        .collect();
    table(&members, matches)
}

/// The tie-break chain: points, then goal difference, then goals for,
/// all descending. No further tie-break is defined.
pub fn rank_order(a: &TableRow, b: &TableRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Fold one result into a row, seen from the side whose goals are
/// `score.home`.
fn accumulate(row: &mut TableRow, score: Score, result: FormResult) {
    row.played += 1;
    row.goals_for += score.home;
    row.goals_against += score.away;
    match result {
        FormResult::W => {
            row.won += 1;
            row.points += 3;
        }
        FormResult::D => {
            row.drawn += 1;
            row.points += 1;
        }
        FormResult::L => row.lost += 1,
    }
    row.form.push(result);
    if row.form.len() > FORM_LENGTH {
        let overflow = row.form.len() - FORM_LENGTH;
        row.form.drain(0..overflow);
    }
}

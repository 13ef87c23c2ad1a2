//! Integration tests for the standings calculator and tie-break chain.

use league_sim_web::{
    table, FormResult, KnockoutStage, Match, Score, Team, TieLeg,
};

fn teams(n: usize) -> Vec<Team> {
    (0..n).map(|i| Team::new(format!("T{i}"), 70)).collect()
}

fn played(round: u32, home: &Team, away: &Team, score: (u32, u32)) -> Match {
    let mut m = Match::league(round, home.id, away.id);
    m.score = Some(Score::new(score.0, score.1));
    m
}

#[test]
fn points_and_goals_accounting() {
    let roster = teams(4);
    let matches = vec![
        played(1, &roster[0], &roster[1], (2, 0)), // T0 win
        played(1, &roster[2], &roster[3], (1, 1)), // draw
        played(2, &roster[0], &roster[2], (0, 3)), // T2 win
    ];
    let rows = table(&roster, &matches);

    let played_matches = 3;
    let total_points: u32 = rows.iter().map(|r| r.points).sum();
    assert!(total_points <= 3 * played_matches);

    let goals_for: u32 = rows.iter().map(|r| r.goals_for).sum();
    let goals_against: u32 = rows.iter().map(|r| r.goals_against).sum();
    assert_eq!(goals_for, goals_against);

    let t2 = rows.iter().find(|r| r.team_id == roster[2].id).unwrap();
    assert_eq!((t2.played, t2.won, t2.drawn, t2.lost), (2, 1, 1, 0));
    assert_eq!(t2.points, 4);
    assert_eq!(t2.goal_difference(), 3);
}

#[test]
fn tie_break_chain_points_then_gd_then_gf() {
    let roster = teams(4);
    // T0: 3 pts, GD +1, GF 2. T1: 3 pts, GD +1, GF 3.
    // T2: 3 pts, GD +3. T3: 0 pts from three losses.
    let matches = vec![
        played(1, &roster[0], &roster[3], (2, 1)),
        played(2, &roster[1], &roster[3], (3, 2)),
        played(3, &roster[2], &roster[3], (3, 0)),
    ];
    let rows = table(&roster, &matches);
    assert_eq!(rows[0].team_id, roster[2].id, "highest GD first");
    assert_eq!(rows[1].team_id, roster[1].id, "GF breaks equal GD");
    assert_eq!(rows[2].team_id, roster[0].id);
    assert_eq!(rows[3].team_id, roster[3].id);
}

#[test]
fn knockout_matches_never_count() {
    let roster = teams(2);
    let mut ko = Match::knockout(
        1,
        roster[0].id,
        roster[1].id,
        KnockoutStage::Final,
        TieLeg::Single,
    );
    ko.score = Some(Score::new(4, 0));
    let rows = table(&roster, &[ko]);
    for row in rows {
        assert_eq!(row.played, 0);
        assert_eq!(row.points, 0);
        assert_eq!(row.goals_for, 0);
    }
}

#[test]
fn unplayed_matches_never_count() {
    let roster = teams(2);
    let m = Match::league(1, roster[0].id, roster[1].id);
    let rows = table(&roster, &[m]);
    assert!(rows.iter().all(|r| r.played == 0));
}

#[test]
fn form_keeps_last_five_oldest_dropped() {
    let roster = teams(2);
    // W W D L W W L as seen by T0; window is the last five.
    let scores = [(1, 0), (2, 0), (1, 1), (0, 1), (3, 1), (2, 1), (0, 2)];
    let matches: Vec<Match> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| played(i as u32 + 1, &roster[0], &roster[1], s))
        .collect();
    let rows = table(&roster, &matches);
    let t0 = rows.iter().find(|r| r.team_id == roster[0].id).unwrap();
    assert_eq!(
        t0.form,
        vec![FormResult::D, FormResult::L, FormResult::W, FormResult::W, FormResult::L]
    );
}

#[test]
fn stable_order_for_fully_level_teams() {
    let roster = teams(3);
    // T0 and T1 never play: both zero rows, equal on every key.
    let rows = table(&roster, &[]);
    assert_eq!(rows[0].team_id, roster[0].id);
    assert_eq!(rows[1].team_id, roster[1].id);
    assert_eq!(rows[2].team_id, roster[2].id);
}

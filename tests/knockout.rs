//! Integration tests for bracket construction and knockout progression.

use league_sim_web::{
    bracket_from_groups, build_ties, knockout_draw, next_knockout_round, stage_for_size,
    CompetitionError, KnockoutStage, Match, MatchKind, Score, Team, TeamId, TieLeg,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn teams(n: usize) -> Vec<Team> {
    (0..n).map(|i| Team::new(format!("T{i}"), 70)).collect()
}

fn set_penalty(m: &mut Match, winner: TeamId) {
    match &mut m.kind {
        MatchKind::Knockout { penalty_winner, .. } => *penalty_winner = Some(winner),
        _ => panic!("not a knockout match"),
    }
}

#[test]
fn stage_names_derive_from_field_size() {
    assert_eq!(stage_for_size(32).unwrap(), KnockoutStage::R32);
    assert_eq!(stage_for_size(16).unwrap(), KnockoutStage::R16);
    assert_eq!(stage_for_size(8).unwrap(), KnockoutStage::QuarterFinal);
    assert_eq!(stage_for_size(4).unwrap(), KnockoutStage::SemiFinal);
    assert_eq!(stage_for_size(2).unwrap(), KnockoutStage::Final);
    assert_eq!(
        stage_for_size(6).unwrap_err(),
        CompetitionError::UnsupportedBracketSize(6)
    );
    assert_eq!(
        stage_for_size(0).unwrap_err(),
        CompetitionError::UnsupportedBracketSize(0)
    );
}

#[test]
fn random_draw_pairs_everyone_once() {
    let roster = teams(8);
    let mut rng = StdRng::seed_from_u64(3);
    let fixtures = knockout_draw(&roster, 5, false, &mut rng).unwrap();

    assert_eq!(fixtures.len(), 4);
    let mut seen = HashSet::new();
    for m in &fixtures {
        assert_eq!(m.round, 5);
        assert_eq!(m.knockout_stage(), Some(KnockoutStage::QuarterFinal));
        assert_eq!(m.tie_leg(), Some(TieLeg::Single));
        assert!(seen.insert(m.home));
        assert!(seen.insert(m.away));
    }
    assert_eq!(seen.len(), 8);
}

#[test]
fn double_leg_draw_builds_mirrored_legs() {
    let roster = teams(4);
    let mut rng = StdRng::seed_from_u64(3);
    let fixtures = knockout_draw(&roster, 1, true, &mut rng).unwrap();
    assert_eq!(fixtures.len(), 4); // 2 ties, 2 legs each

    let firsts: Vec<&Match> = fixtures
        .iter()
        .filter(|m| m.tie_leg() == Some(TieLeg::First))
        .collect();
    assert_eq!(firsts.len(), 2);
    for leg1 in firsts {
        assert_eq!(leg1.round, 1);
        let leg2 = fixtures
            .iter()
            .find(|m| m.tie_leg() == Some(TieLeg::Second { first_leg: leg1.id }))
            .expect("second leg exists");
        assert_eq!(leg2.round, 2);
        assert_eq!(leg2.home, leg1.away);
        assert_eq!(leg2.away, leg1.home);
        assert_eq!(leg2.knockout_stage(), leg1.knockout_stage());
    }
}

#[test]
fn final_is_always_single_leg() {
    let roster = teams(2);
    let ties = build_ties(&[(roster[0].id, roster[1].id)], KnockoutStage::Final, 9, true);
    assert_eq!(ties.len(), 1);
    assert_eq!(ties[0].tie_leg(), Some(TieLeg::Single));
}

#[test]
fn progression_pairs_winners_top_vs_bottom() {
    let roster = teams(8);
    let pairs: Vec<(TeamId, TeamId)> = roster.chunks(2).map(|c| (c[0].id, c[1].id)).collect();
    let mut quarter = build_ties(&pairs, KnockoutStage::QuarterFinal, 1, false);
    // Home side wins every tie.
    for m in &mut quarter {
        m.score = Some(Score::new(2, 0));
    }
    let refs: Vec<&Match> = quarter.iter().collect();
    let semis = next_knockout_round(&refs, 2, false).unwrap();

    assert_eq!(semis.len(), 2);
    for m in &semis {
        assert_eq!(m.round, 2);
        assert_eq!(m.knockout_stage(), Some(KnockoutStage::SemiFinal));
    }
    // Winners in schedule order are the home teams of ties 1..4; the
    // pairing is first vs last, second vs third.
    assert_eq!(semis[0].home, quarter[0].home);
    assert_eq!(semis[0].away, quarter[3].home);
    assert_eq!(semis[1].home, quarter[1].home);
    assert_eq!(semis[1].away, quarter[2].home);
}

#[test]
fn two_winners_make_a_final() {
    let roster = teams(4);
    let pairs: Vec<(TeamId, TeamId)> = roster.chunks(2).map(|c| (c[0].id, c[1].id)).collect();
    let mut semis = build_ties(&pairs, KnockoutStage::SemiFinal, 1, true);
    for m in &mut semis {
        // Home of leg 1 wins both ties on aggregate.
        m.score = Some(match m.tie_leg() {
            Some(TieLeg::First) => Score::new(2, 0),
            _ => Score::new(1, 1),
        });
    }
    let refs: Vec<&Match> = semis.iter().collect();
    let last_round = semis.iter().map(|m| m.round).max().unwrap();
    let final_round = next_knockout_round(&refs, last_round + 1, true).unwrap();

    assert_eq!(final_round.len(), 1);
    assert_eq!(final_round[0].knockout_stage(), Some(KnockoutStage::Final));
    assert_eq!(final_round[0].tie_leg(), Some(TieLeg::Single));
}

#[test]
fn aggregate_favours_leg_one_home_team() {
    let roster = teams(2);
    let (a, b) = (roster[0].id, roster[1].id);
    let mut tie = build_ties(&[(a, b)], KnockoutStage::SemiFinal, 1, true);
    tie[0].score = Some(Score::new(2, 1)); // A 2-1 B
    tie[1].score = Some(Score::new(0, 1)); // B 0-1 A
    let refs: Vec<&Match> = tie.iter().collect();
    let winners = league_sim_web::stage_winners(&refs).unwrap();
    assert_eq!(winners, vec![a]);
}

#[test]
fn level_aggregate_settled_by_leg_two_shootout() {
    let roster = teams(2);
    let (a, b) = (roster[0].id, roster[1].id);
    let mut tie = build_ties(&[(a, b)], KnockoutStage::SemiFinal, 1, true);
    tie[0].score = Some(Score::new(1, 1));
    tie[1].score = Some(Score::new(1, 1));
    set_penalty(&mut tie[1], b);
    let refs: Vec<&Match> = tie.iter().collect();
    let winners = league_sim_web::stage_winners(&refs).unwrap();
    assert_eq!(winners, vec![b]);
}

#[test]
fn level_aggregate_without_shootout_fails_loudly() {
    let roster = teams(2);
    let mut tie = build_ties(
        &[(roster[0].id, roster[1].id)],
        KnockoutStage::SemiFinal,
        1,
        true,
    );
    tie[0].score = Some(Score::new(0, 0));
    tie[1].score = Some(Score::new(2, 2));
    let leg2_id = tie[1].id;
    let refs: Vec<&Match> = tie.iter().collect();
    assert_eq!(
        league_sim_web::stage_winners(&refs).unwrap_err(),
        CompetitionError::MissingPenaltyWinner(leg2_id)
    );
}

#[test]
fn level_single_leg_uses_recorded_shootout() {
    let roster = teams(2);
    let (a, b) = (roster[0].id, roster[1].id);
    let mut tie = build_ties(&[(a, b)], KnockoutStage::Final, 1, false);
    tie[0].score = Some(Score::new(2, 2));
    set_penalty(&mut tie[0], b);
    let refs: Vec<&Match> = tie.iter().collect();
    assert_eq!(league_sim_web::stage_winners(&refs).unwrap(), vec![b]);
}

#[test]
fn unplayed_and_missing_leg_invariants() {
    let roster = teams(2);
    let (a, b) = (roster[0].id, roster[1].id);

    let unplayed = build_ties(&[(a, b)], KnockoutStage::Final, 1, false);
    let refs: Vec<&Match> = unplayed.iter().collect();
    assert_eq!(
        league_sim_web::stage_winners(&refs).unwrap_err(),
        CompetitionError::UnplayedMatch(unplayed[0].id)
    );

    // A first leg whose second leg was never scheduled.
    let mut orphan = Match::knockout(1, a, b, KnockoutStage::SemiFinal, TieLeg::First);
    orphan.score = Some(Score::new(1, 0));
    let refs = vec![&orphan];
    assert_eq!(
        league_sim_web::stage_winners(&refs).unwrap_err(),
        CompetitionError::MissingSecondLeg(orphan.id)
    );
}

#[test]
fn group_bracket_is_deterministic_and_rank_paired() {
    // One group of four with a fully decided table: T0 beats everyone,
    // T1 beats all but T0, and so on down.
    let mut roster = teams(4);
    for t in &mut roster {
        t.group = Some('A');
    }
    let goals = |id: TeamId| {
        roster.iter().position(|t| t.id == id).map(|i| 3 - i as u32).unwrap()
    };
    let mut matches = Vec::new();
    let mut round = 0;
    for i in 0..roster.len() {
        for j in (i + 1)..roster.len() {
            round += 1;
            let mut m = Match::group(round, roster[i].id, roster[j].id, 'A');
            m.score = Some(Score::new(goals(roster[i].id), goals(roster[j].id)));
            matches.push(m);
        }
    }

    let bracket = bracket_from_groups(&roster, &matches, 2, round + 1, false).unwrap();
    assert_eq!(bracket.len(), 1);
    assert_eq!(bracket[0].knockout_stage(), Some(KnockoutStage::Final));
    assert_eq!(bracket[0].home, roster[0].id, "group winner at home");
    assert_eq!(bracket[0].away, roster[1].id, "runner-up away");

    // Same standings, same pairing.
    let again = bracket_from_groups(&roster, &matches, 2, round + 1, false).unwrap();
    assert_eq!((again[0].home, again[0].away), (bracket[0].home, bracket[0].away));
}

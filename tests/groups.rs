//! Integration tests for group composition.

use league_sim_web::{compose_groups, CompetitionError, Team};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn teams(n: usize) -> Vec<Team> {
    (0..n).map(|i| Team::new(format!("T{i}"), 70)).collect()
}

#[test]
fn partitions_and_labels_groups() {
    let roster = teams(8);
    let mut rng = StdRng::seed_from_u64(42);
    let (matches, labeled) = compose_groups(&roster, 2, false, &mut rng).unwrap();

    // Every team got exactly one label, 4 per group.
    let mut sizes: HashMap<char, usize> = HashMap::new();
    for t in &labeled {
        *sizes.entry(t.group.expect("labeled")).or_default() += 1;
    }
    assert_eq!(sizes.len(), 2);
    assert_eq!(sizes[&'A'], 4);
    assert_eq!(sizes[&'B'], 4);

    // Each group of 4 round-robins itself: 6 matches over 3 rounds.
    assert_eq!(matches.len(), 12);
    for m in &matches {
        let group = m.group_label().expect("group tagged");
        assert!(group == 'A' || group == 'B');
        assert!(m.counts_for_table());
        assert!((1..=3).contains(&m.round));
    }

    // Matches only pair teams from the same group.
    let label_of: HashMap<_, _> = labeled.iter().map(|t| (t.id, t.group)).collect();
    for m in &matches {
        assert_eq!(label_of[&m.home], label_of[&m.away]);
        assert_eq!(label_of[&m.home], Some(m.group_label().unwrap()));
    }
}

#[test]
fn double_round_groups() {
    let roster = teams(4);
    let mut rng = StdRng::seed_from_u64(1);
    let (matches, _) = compose_groups(&roster, 1, true, &mut rng).unwrap();
    assert_eq!(matches.len(), 12); // 2 * (4-1) rounds of 2
    assert_eq!(matches.iter().map(|m| m.round).max(), Some(6));
}

#[test]
fn same_seed_same_draw() {
    let roster = teams(8);
    let draw = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let (matches, labeled) = compose_groups(&roster, 2, false, &mut rng).unwrap();
        let pairings: Vec<_> = matches
            .iter()
            .map(|m| (m.round, m.home, m.away, m.group_label()))
            .collect();
        let labels: Vec<_> = labeled.iter().map(|t| (t.id, t.group)).collect();
        (pairings, labels)
    };
    assert_eq!(draw(7), draw(7));
    // Different seed almost certainly draws differently for 8 teams.
    assert_ne!(draw(7), draw(8));
}

#[test]
fn group_count_must_divide_roster() {
    let roster = teams(10);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        compose_groups(&roster, 3, false, &mut rng).unwrap_err(),
        CompetitionError::GroupCountMismatch { teams: 10, groups: 3 }
    );
}

#[test]
fn odd_group_size_is_rejected() {
    // 6 teams in 2 groups would mean groups of 3: the per-group round
    // robin has no bye handling, so composition must refuse.
    let roster = teams(6);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        compose_groups(&roster, 2, false, &mut rng).unwrap_err(),
        CompetitionError::OddPool { size: 3 }
    );
}

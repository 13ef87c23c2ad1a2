//! Match (fixture), stage/leg structure, and table rows.

use crate::models::team::{GroupLabel, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Named knockout rounds. R32 is reserved for 32-team brackets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutStage {
    R32,
    R16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl KnockoutStage {
    /// Display name for news items and the API.
    pub fn label(self) -> &'static str {
        match self {
            KnockoutStage::R32 => "Round of 32",
            KnockoutStage::R16 => "Round of 16",
            KnockoutStage::QuarterFinal => "Quarter-finals",
            KnockoutStage::SemiFinal => "Semi-finals",
            KnockoutStage::Final => "Final",
        }
    }
}

/// Which leg of a knockout tie a fixture is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "leg")]
pub enum TieLeg {
    /// One-off tie (always the case for the final).
    Single,
    /// First leg of a two-legged tie; the second leg points back here.
    First,
    /// Second leg, home/away swapped from the first.
    Second { first_leg: MatchId },
}

/// What kind of fixture this is. League and group matches count toward
/// the table; knockout matches never do. A match can only carry a
/// penalty winner if it is a knockout match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchKind {
    League,
    Group { group: GroupLabel },
    Knockout {
        stage: KnockoutStage,
        tie: TieLeg,
        /// Set only when the tie finished level on score/aggregate.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        penalty_winner: Option<TeamId>,
    },
}

/// Full-time score of a played match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// The same result seen from the other side.
    pub fn flipped(self) -> Self {
        Self {
            home: self.away,
            away: self.home,
        }
    }

    pub fn level(self) -> bool {
        self.home == self.away
    }
}

/// A scheduled fixture. `score` is `None` until the match is played;
/// outcome fields (score, commentary, penalty winner) are the only
/// things that ever change after creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based, strictly increasing across the competition.
    pub round: u32,
    pub home: TeamId,
    pub away: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    #[serde(flatten)]
    pub kind: MatchKind,
}

impl Match {
    pub fn new(round: u32, home: TeamId, away: TeamId, kind: MatchKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            home,
            away,
            score: None,
            commentary: None,
            kind,
        }
    }

    pub fn league(round: u32, home: TeamId, away: TeamId) -> Self {
        Self::new(round, home, away, MatchKind::League)
    }

    pub fn group(round: u32, home: TeamId, away: TeamId, group: GroupLabel) -> Self {
        Self::new(round, home, away, MatchKind::Group { group })
    }

    pub fn knockout(round: u32, home: TeamId, away: TeamId, stage: KnockoutStage, tie: TieLeg) -> Self {
        Self::new(
            round,
            home,
            away,
            MatchKind::Knockout {
                stage,
                tie,
                penalty_winner: None,
            },
        )
    }

    pub fn played(&self) -> bool {
        self.score.is_some()
    }

    /// Only league and group-stage matches feed the standings table.
    pub fn counts_for_table(&self) -> bool {
        matches!(self.kind, MatchKind::League | MatchKind::Group { .. })
    }

    pub fn knockout_stage(&self) -> Option<KnockoutStage> {
        match self.kind {
            MatchKind::Knockout { stage, .. } => Some(stage),
            _ => None,
        }
    }

    pub fn group_label(&self) -> Option<GroupLabel> {
        match self.kind {
            MatchKind::Group { group } => Some(group),
            _ => None,
        }
    }

    pub fn tie_leg(&self) -> Option<TieLeg> {
        match self.kind {
            MatchKind::Knockout { tie, .. } => Some(tie),
            _ => None,
        }
    }

    pub fn penalty_winner(&self) -> Option<TeamId> {
        match self.kind {
            MatchKind::Knockout { penalty_winner, .. } => penalty_winner,
            _ => None,
        }
    }
}

/// One result in a team's recent-form window.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

/// Per-team standings aggregate. Always recomputed from the match
/// list, never stored as source of truth.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub team_id: TeamId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    /// Last five results, oldest first.
    pub form: Vec<FormResult>,
}

impl TableRow {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            form: Vec::new(),
        }
    }

    /// Derived, never stored independently of goals for/against.
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

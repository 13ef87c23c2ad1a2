//! Competition state, configuration, errors, news, and snapshots.

use crate::models::fixture::{KnockoutStage, Match, MatchId};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Errors that can occur during competition operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompetitionError {
    /// Round-robin pool has an odd number of teams (byes unsupported).
    OddPool { size: usize },
    /// Group count does not evenly divide the roster.
    GroupCountMismatch { teams: usize, groups: usize },
    /// Advancing-per-group must be smaller than the group size.
    AdvancingTooLarge { advancing: usize, group_size: usize },
    /// Bracket sizes are limited to 2, 4, 8, 16 and 32 entrants.
    UnsupportedBracketSize(usize),
    /// Qualification/relegation spots exceed the roster.
    BadSpotCounts,
    /// Match id not present in the competition.
    MatchNotFound(MatchId),
    /// A match reached progression without a recorded score.
    UnplayedMatch(MatchId),
    /// A first leg reached progression with no second leg scheduled.
    MissingSecondLeg(MatchId),
    /// A level knockout tie has no penalty-shootout winner recorded.
    MissingPenaltyWinner(MatchId),
    /// The submitted penalty winner is neither side of the match.
    PenaltyWinnerNotInMatch(MatchId),
}

impl std::fmt::Display for CompetitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionError::OddPool { size } => {
                write!(f, "Round-robin pool must have an even number of teams (got {})", size)
            }
            CompetitionError::GroupCountMismatch { teams, groups } => {
                write!(f, "{} teams cannot be split evenly into {} groups", teams, groups)
            }
            CompetitionError::AdvancingTooLarge { advancing, group_size } => {
                write!(f, "Cannot advance {} teams from groups of {}", advancing, group_size)
            }
            CompetitionError::UnsupportedBracketSize(n) => {
                write!(f, "No knockout stage for {} entrants (supported: 2, 4, 8, 16, 32)", n)
            }
            CompetitionError::BadSpotCounts => {
                write!(f, "Qualification and relegation spots must fit inside the roster")
            }
            CompetitionError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            CompetitionError::UnplayedMatch(id) => {
                write!(f, "Match {} has no result but its stage is being resolved", id)
            }
            CompetitionError::MissingSecondLeg(id) => {
                write!(f, "First leg {} has no scheduled second leg", id)
            }
            CompetitionError::MissingPenaltyWinner(id) => {
                write!(f, "Match {} is level but carries no penalty-shootout winner", id)
            }
            CompetitionError::PenaltyWinnerNotInMatch(id) => {
                write!(f, "Penalty winner is not a participant of match {}", id)
            }
        }
    }
}

impl std::error::Error for CompetitionError {}

/// League or cup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionType {
    #[default]
    League,
    Cup,
}

/// How a cup is structured.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CupFormat {
    /// Straight knockout from a random draw.
    #[default]
    Knockout,
    /// Group stage feeding a seeded knockout bracket.
    GroupKnockout,
}

/// Format parameters, fixed for the life of one competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompetitionConfig {
    pub name: String,
    pub format: CompetitionType,
    pub team_count: usize,
    /// League / group stage: home-and-away double round.
    #[serde(default)]
    pub double_round: bool,
    #[serde(default)]
    pub qualification_spots: usize,
    #[serde(default)]
    pub relegation_spots: usize,
    #[serde(default)]
    pub cup_format: CupFormat,
    #[serde(default = "default_group_count")]
    pub group_count: usize,
    #[serde(default = "default_advancing")]
    pub advancing_per_group: usize,
    /// Knockout ties over two legs (the final is always one leg).
    #[serde(default)]
    pub double_leg_playoffs: bool,
}

fn default_group_count() -> usize {
    1
}

fn default_advancing() -> usize {
    2
}

/// A dated entry in the competition's news feed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Uuid,
    pub round: u32,
    pub headline: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl NewsItem {
    pub fn new(round: u32, headline: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            headline: headline.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Full competition state. The match list is append-and-patch only:
/// fixtures are appended by stage transitions and never removed or
/// renumbered; only outcome fields of existing matches change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub config: CompetitionConfig,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub news: Vec<NewsItem>,
    /// UI navigation pointer only; generation logic never reads it.
    pub current_round: u32,
}

impl Competition {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_name(&self, id: TeamId) -> &str {
        self.team(id).map(|t| t.name.as_str()).unwrap_or("Unknown")
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Highest scheduled round (0 when no fixtures exist).
    pub fn max_round(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    pub fn matches_for_round(&self, round: u32) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.round == round).collect()
    }

    pub fn round_played(&self, round: u32) -> bool {
        let mut any = false;
        for m in self.matches.iter().filter(|m| m.round == round) {
            if !m.played() {
                return false;
            }
            any = true;
        }
        any
    }

    /// Latest round whose fixtures are all played (0 if none).
    pub fn last_completed_round(&self) -> u32 {
        (1..=self.max_round())
            .rev()
            .find(|&r| self.round_played(r))
            .unwrap_or(0)
    }

    /// The terminal state: the final has been played.
    pub fn finished(&self) -> bool {
        self.matches
            .iter()
            .any(|m| m.knockout_stage() == Some(KnockoutStage::Final) && m.played())
            || (self.config.format == CompetitionType::League
                && self.max_round() > 0
                && self.round_played(self.max_round()))
    }

    pub fn push_news(&mut self, item: NewsItem) {
        // Newest first, as displayed.
        self.news.insert(0, item);
    }

    /// Serializable snapshot for the persistence collaborator.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            id: self.id,
            config: self.config.clone(),
            teams: self.teams.clone(),
            matches: self.matches.clone(),
            news: self.news.clone(),
            current_round: self.current_round,
            saved_at: Utc::now(),
        }
    }

    /// Restore a competition from a snapshot (lossless round-trip).
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            id: snapshot.id,
            config: snapshot.config,
            teams: snapshot.teams,
            matches: snapshot.matches,
            news: snapshot.news,
            current_round: snapshot.current_round,
        }
    }
}

/// Everything needed to restore a competition, keyed by its identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: CompetitionId,
    pub config: CompetitionConfig,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub news: Vec<NewsItem>,
    pub current_round: u32,
    pub saved_at: DateTime<Utc>,
}

//! Competition setup: configuration validation and initial fixtures.

use crate::logic::fixtures::league_fixtures;
use crate::logic::groups::compose_groups;
use crate::logic::knockout::{knockout_draw, stage_for_size};
use crate::models::{
    Competition, CompetitionConfig, CompetitionError, CompetitionType, CupFormat, NewsItem, Team,
};
use rand::Rng;
use uuid::Uuid;

/// Reject bad format parameters before any fixture generation runs.
///
/// Checks, per format: even roster for a league; a supported bracket
/// size for a straight knockout; for group+knockout, a group count
/// that divides the roster into even-sized groups, an advancing count
/// below the group size, and a qualifier total that maps to a bracket.
pub fn validate_config(config: &CompetitionConfig, team_count: usize) -> Result<(), CompetitionError> {
    match config.format {
        CompetitionType::League => {
            if team_count == 0 || team_count % 2 != 0 {
                return Err(CompetitionError::OddPool { size: team_count });
            }
            if config.qualification_spots + config.relegation_spots > team_count {
                return Err(CompetitionError::BadSpotCounts);
            }
        }
        CompetitionType::Cup => match config.cup_format {
            CupFormat::Knockout => {
                stage_for_size(team_count)?;
            }
            CupFormat::GroupKnockout => {
                let groups = config.group_count;
                if groups == 0 || team_count % groups != 0 {
                    return Err(CompetitionError::GroupCountMismatch {
                        teams: team_count,
                        groups,
                    });
                }
                let group_size = team_count / groups;
                if group_size % 2 != 0 {
                    return Err(CompetitionError::OddPool { size: group_size });
                }
                if config.advancing_per_group >= group_size {
                    return Err(CompetitionError::AdvancingTooLarge {
                        advancing: config.advancing_per_group,
                        group_size,
                    });
                }
                stage_for_size(groups * config.advancing_per_group)?;
            }
        },
    }
    Ok(())
}

/// Validate the configuration, seed the opening fixtures, and return
/// the competition in its starting state (round pointer at 1, a
/// kick-off item in the news feed).
pub fn start_competition(
    mut config: CompetitionConfig,
    teams: Vec<Team>,
    rng: &mut impl Rng,
) -> Result<Competition, CompetitionError> {
    validate_config(&config, teams.len())?;
    config.team_count = teams.len();

    let (matches, teams) = match (config.format, config.cup_format) {
        (CompetitionType::League, _) => (league_fixtures(&teams, config.double_round)?, teams),
        (CompetitionType::Cup, CupFormat::Knockout) => (
            knockout_draw(&teams, 1, config.double_leg_playoffs, rng)?,
            teams,
        ),
        (CompetitionType::Cup, CupFormat::GroupKnockout) => {
            compose_groups(&teams, config.group_count, config.double_round, rng)?
        }
    };

    let kickoff = NewsItem::new(
        0,
        format!("{} Begins!", config.name),
        format!(
            "Welcome to {}. The format is set, the fixtures are out. Let the games begin!",
            config.name
        ),
    );

    Ok(Competition {
        id: Uuid::new_v4(),
        config,
        teams,
        matches,
        news: vec![kickoff],
        current_round: 1,
    })
}

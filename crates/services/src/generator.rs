//! Round-robin fixture generation. Pure functions: the RNG is injected so
//! tests can pin the shuffle and the arena draw.

use chrono::{Days, Duration, FixedOffset, LocalResult, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use matchday_models::{Arena, Competition, GameError, Match, MatchKind, Result};

/// Creates combinations of teams for matches, each team against each other
/// team. `doubles` is how many matches two exact teams play; for each double
/// the home and away sides are switched.
pub fn create_combinations(teams: &[Uuid], doubles: u32) -> Result<Vec<(Uuid, Uuid)>> {
    if teams.len() < 2 {
        return Err(GameError::InvalidArgument(
            "Cannot generate combinations for fewer than 2 teams".to_string(),
        ));
    }
    if doubles < 1 {
        return Err(GameError::InvalidArgument(
            "Number of doubles cannot be lower than 1".to_string(),
        ));
    }

    let pair_count = teams.len() * (teams.len() - 1) / 2;
    let mut combinations = Vec::with_capacity(pair_count * doubles as usize);

    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            for double in 0..doubles {
                if double % 2 == 0 {
                    combinations.push((teams[i], teams[j]));
                } else {
                    combinations.push((teams[j], teams[i]));
                }
            }
        }
    }

    Ok(combinations)
}

/// Creates one match per combination, spread evenly across the competition
/// window. Combinations are shuffled first so one team's matches do not
/// cluster; each match starts at 08:00 in the given zone offset with an arena
/// drawn uniformly at random. The produced matches are plain records: nothing
/// is armed for execution here.
pub fn create_matches<R: Rng>(
    competition: &Competition,
    mut combinations: Vec<(Uuid, Uuid)>,
    arenas: &[Arena],
    zone_offset: FixedOffset,
    rng: &mut R,
) -> Result<Vec<Match>> {
    if combinations.is_empty() {
        return Err(GameError::InvalidArgument(
            "Cannot create matches for empty combinations".to_string(),
        ));
    }
    if arenas.is_empty() {
        return Err(GameError::NoArenasAvailable);
    }
    competition.validate_window()?;

    let number_of_days = (competition.end_at - competition.start_at).num_days();
    let matches_interval = number_of_days as f64 / combinations.len() as f64;
    combinations.shuffle(rng);

    let window_start = NaiveTime::MIN + Duration::hours(8);

    let mut matches = Vec::with_capacity(combinations.len());
    for (index, (home_team, away_team)) in combinations.into_iter().enumerate() {
        let day_offset = (index as f64 * matches_interval).floor() as u64;
        let match_date = competition
            .start_at
            .checked_add_days(Days::new(day_offset))
            .ok_or_else(|| {
                GameError::InvalidArgument(format!(
                    "Match date overflows calendar at day offset {day_offset}"
                ))
            })?;

        let start_at = match match_date.and_time(window_start).and_local_timezone(zone_offset) {
            LocalResult::Single(start_at) => start_at,
            _ => {
                return Err(GameError::InvalidArgument(format!(
                    "Ambiguous match start time on {match_date}"
                )))
            }
        };

        let arena = &arenas[rng.gen_range(0..arenas.len())];

        matches.push(Match {
            guid: Uuid::new_v4(),
            competition_guid: Some(competition.guid),
            arena_guid: arena.guid,
            home_team,
            away_team,
            kind: MatchKind::GroupStage,
            start_at,
            end_at: None,
            result: None,
        });
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn team_ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn competition(days: u64, teams: Vec<Uuid>) -> Competition {
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        Competition {
            guid: Uuid::new_v4(),
            name: "Test League".to_string(),
            start_at: start,
            end_at: start + Days::new(days),
            teams,
        }
    }

    fn arenas(n: usize) -> Vec<Arena> {
        (0..n)
            .map(|i| Arena::new("CZE", "Brno", &format!("Arena {i}")))
            .collect()
    }

    #[test]
    fn test_single_double_pairs_every_team_once() {
        let teams = team_ids(4);
        let combinations = create_combinations(&teams, 1).unwrap();

        // C(4, 2) pairs
        assert_eq!(combinations.len(), 6);
        for (home, away) in &combinations {
            assert_ne!(home, away);
        }
    }

    #[test]
    fn test_doubles_alternate_home_and_away() {
        let teams = team_ids(2);
        let combinations = create_combinations(&teams, 3).unwrap();

        assert_eq!(combinations.len(), 3);
        assert_eq!(combinations[0], (teams[0], teams[1]));
        assert_eq!(combinations[1], (teams[1], teams[0]));
        assert_eq!(combinations[2], (teams[0], teams[1]));
    }

    #[test]
    fn test_too_few_teams_is_invalid() {
        assert!(create_combinations(&team_ids(1), 1).is_err());
        assert!(create_combinations(&[], 1).is_err());
    }

    #[test]
    fn test_zero_doubles_is_invalid() {
        assert!(create_combinations(&team_ids(3), 0).is_err());
    }

    #[test]
    fn test_matches_fall_inside_competition_window() {
        let teams = team_ids(5);
        let competition = competition(30, teams.clone());
        let combinations = create_combinations(&teams, 2).unwrap();
        let arenas = arenas(3);
        let mut rng = SmallRng::seed_from_u64(7);
        let offset = FixedOffset::east_opt(3600).unwrap();

        let matches =
            create_matches(&competition, combinations, &arenas, offset, &mut rng).unwrap();

        assert_eq!(matches.len(), 20);
        let mut previous = None;
        for m in &matches {
            let date = m.start_at.date_naive();
            assert!(date >= competition.start_at && date <= competition.end_at);
            assert_eq!(m.start_at.time(), NaiveTime::MIN + Duration::hours(8));
            assert!(m.end_at.is_none());
            assert!(m.result.is_none());
            assert_eq!(m.kind, MatchKind::GroupStage);
            assert_eq!(m.competition_guid, Some(competition.guid));
            assert!(arenas.iter().any(|a| a.guid == m.arena_guid));
            if let Some(previous) = previous {
                assert!(m.start_at >= previous, "start times must be non-decreasing");
            }
            previous = Some(m.start_at);
        }
    }

    #[test]
    fn test_single_day_window_puts_all_matches_on_that_day() {
        let teams = team_ids(3);
        let competition = competition(0, teams.clone());
        let combinations = create_combinations(&teams, 1).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let offset = FixedOffset::east_opt(0).unwrap();

        let matches =
            create_matches(&competition, combinations, &arenas(1), offset, &mut rng).unwrap();
        assert!(matches
            .iter()
            .all(|m| m.start_at.date_naive() == competition.start_at));
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let teams = team_ids(4);
        let competition = competition(10, teams.clone());
        let arenas = arenas(4);
        let offset = FixedOffset::east_opt(7200).unwrap();

        let first = create_matches(
            &competition,
            create_combinations(&teams, 1).unwrap(),
            &arenas,
            offset,
            &mut SmallRng::seed_from_u64(42),
        )
        .unwrap();
        let second = create_matches(
            &competition,
            create_combinations(&teams, 1).unwrap(),
            &arenas,
            offset,
            &mut SmallRng::seed_from_u64(42),
        )
        .unwrap();

        let pairings = |matches: &[Match]| {
            matches
                .iter()
                .map(|m| (m.home_team, m.away_team, m.arena_guid, m.start_at))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairings(&first), pairings(&second));
    }

    #[test]
    fn test_empty_combinations_are_rejected() {
        let competition = competition(5, team_ids(2));
        let mut rng = SmallRng::seed_from_u64(0);
        let offset = FixedOffset::east_opt(0).unwrap();
        assert!(create_matches(&competition, vec![], &arenas(1), offset, &mut rng).is_err());
    }

    #[test]
    fn test_no_arenas_aborts_generation() {
        let teams = team_ids(2);
        let competition = competition(5, teams.clone());
        let combinations = create_combinations(&teams, 1).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let offset = FixedOffset::east_opt(0).unwrap();

        assert!(matches!(
            create_matches(&competition, combinations, &[], offset, &mut rng),
            Err(GameError::NoArenasAvailable)
        ));
    }

    proptest! {
        #[test]
        fn prop_combination_count_and_pair_multiplicity(
            n in 2usize..7,
            doubles in 1u32..5,
        ) {
            let teams = team_ids(n);
            let combinations = create_combinations(&teams, doubles).unwrap();

            prop_assert_eq!(
                combinations.len(),
                doubles as usize * n * (n - 1) / 2
            );

            let mut per_pair: HashMap<(Uuid, Uuid), u32> = HashMap::new();
            for (home, away) in &combinations {
                let key = if home < away { (*home, *away) } else { (*away, *home) };
                *per_pair.entry(key).or_default() += 1;
            }
            prop_assert_eq!(per_pair.len(), n * (n - 1) / 2);
            prop_assert!(per_pair.values().all(|&count| count == doubles));
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use uuid::Uuid;

use matchday_db::{InMemoryMatchStore, MatchStore};
use matchday_models::{Arena, Competition, MatchKind};
use matchday_services::MatchService;

async fn store_with_competition(
    team_count: usize,
    window_days: u64,
) -> (Arc<dyn MatchStore>, Competition, Vec<Arena>) {
    let store = Arc::new(InMemoryMatchStore::new());

    let mut arenas = Vec::new();
    for i in 0..4 {
        let arena = store
            .save_arena(Arena::new("CZE", "Brno", &format!("Hall {i}")))
            .await
            .unwrap();
        arenas.push(arena);
    }

    let start = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
    let competition = store
        .save_competition(Competition::new(
            "Integration League".to_string(),
            start,
            start + Days::new(window_days),
            (0..team_count).map(|_| Uuid::new_v4()).collect(),
        ))
        .await
        .unwrap();

    (store, competition, arenas)
}

#[tokio::test]
async fn test_three_teams_single_double_yields_three_fixtures() {
    let (store, competition, arenas) = store_with_competition(3, 10).await;
    let service = MatchService::new(store, 1).with_rng(SmallRng::seed_from_u64(21));

    let matches = service.generate_matches(competition.guid).await.unwrap();
    assert_eq!(matches.len(), 3);

    // Every unordered pair appears exactly once.
    let mut pairs: Vec<(Uuid, Uuid)> = matches
        .iter()
        .map(|m| {
            if m.home_team < m.away_team {
                (m.home_team, m.away_team)
            } else {
                (m.away_team, m.home_team)
            }
        })
        .collect();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), 3);

    for m in &matches {
        assert_eq!(m.kind, MatchKind::GroupStage);
        assert_eq!(m.competition_guid, Some(competition.guid));
        assert!(arenas.iter().any(|a| a.guid == m.arena_guid));
        let date = m.start_at.date_naive();
        assert!(date >= competition.start_at && date <= competition.end_at);
        assert!(m.end_at.is_none());
        assert!(m.result.is_none());
    }
}

#[tokio::test]
async fn test_even_doubles_balance_home_and_away() {
    let (store, competition, _) = store_with_competition(4, 20).await;
    let service = MatchService::new(store, 2).with_rng(SmallRng::seed_from_u64(8));

    let matches = service.generate_matches(competition.guid).await.unwrap();
    // C(4,2) * 2 doubles
    assert_eq!(matches.len(), 12);

    let mut home_counts: HashMap<Uuid, usize> = HashMap::new();
    for m in &matches {
        *home_counts.entry(m.home_team).or_default() += 1;
    }

    // With d = 2 every team is at home exactly once per opponent.
    for team in &competition.teams {
        assert_eq!(home_counts.get(team), Some(&3));
    }
}

#[tokio::test]
async fn test_repeated_generation_returns_persisted_fixtures() {
    let (store, competition, _) = store_with_competition(3, 6).await;
    let service = MatchService::new(Arc::clone(&store), 1).with_rng(SmallRng::seed_from_u64(2));

    let generated = service.generate_matches(competition.guid).await.unwrap();
    let persisted = store.matches_of_competition(competition.guid).await.unwrap();
    assert_eq!(generated.len(), persisted.len());

    let again = service.generate_matches(competition.guid).await.unwrap();
    assert_eq!(again.len(), generated.len());
    assert_eq!(
        store.matches_of_competition(competition.guid).await.unwrap().len(),
        generated.len(),
        "second generation call must not add fixtures"
    );
}

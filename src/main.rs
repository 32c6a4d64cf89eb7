mod config;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Days, Local};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use config::AppConfig;
use matchday_db::{DatabaseConnection, InMemoryMatchStore, MatchStore, PgMatchStore};
use matchday_models::{Arena, Competition};
use matchday_services::{GameService, MatchPoller, MatchService, TaskScheduler};
use matchday_stream::{result_channel, RedisResultStream};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchday_rs=debug,matchday_services=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Matchday fixture and scheduling engine");

    // Load configuration
    let app_config = AppConfig::new()?;
    let scheduling = app_config.scheduling_config();
    scheduling.validate()?;
    info!("✅ Configuration loaded successfully");
    info!(
        "⚙️  Poll every {}s, arming matches starting within {}h",
        scheduling.fetch_interval_secs, scheduling.match_schedule_offset_hours
    );

    // Pick the match store
    let mut demo_competition = None;
    let store: Arc<dyn MatchStore> = if app_config.database.in_memory {
        info!("🗄️  Using in-memory match store with demo seed data");
        let store = InMemoryMatchStore::new();
        demo_competition = Some(seed_demo_data(&store).await?);
        Arc::new(store)
    } else {
        info!("📊 Database: {}", app_config.database.url);
        let connection = DatabaseConnection::new(
            &app_config.database.url,
            app_config.database.max_connections,
        )
        .await?;
        connection.run_migrations().await?;
        Arc::new(PgMatchStore::new(connection.pool().clone()))
    };

    let match_service = Arc::new(MatchService::new(Arc::clone(&store), scheduling.doubles));

    // Fixture generation runs on-demand, at most once per competition.
    if let Some(competition_guid) = demo_competition {
        let generated = match_service.generate_matches(competition_guid).await?;
        info!("📅 Generated {} fixtures for the demo competition", generated.len());
    }

    // Wire the result bus, the timer registry and the simulation runner
    let (result_sender, mut result_receiver) = result_channel();
    let scheduler = Arc::new(TaskScheduler::new());
    let game = GameService::new(
        Arc::clone(&match_service),
        Arc::clone(&scheduler),
        result_sender,
        scheduling.clone(),
    );

    // Start the upcoming-match poller in background
    let poller = MatchPoller::new(Arc::clone(&match_service), game.clone(), scheduling.clone());
    let poller_handle = tokio::spawn(async move {
        poller.run().await;
    });

    // Optional out-of-process notification channel
    let redis_stream = if app_config.redis.enabled {
        match RedisResultStream::new(&app_config.redis.url, &app_config.redis.stream_key) {
            Ok(stream) => {
                info!("🔄 Redis result stream: {}", app_config.redis.url);
                Some(stream)
            }
            Err(e) => {
                warn!("⚠️  Redis result stream disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    // Consume result notifications
    let consumer_handle = tokio::spawn(async move {
        while let Some(message) = result_receiver.recv().await {
            match message.winner_team {
                Some(winner) => info!(
                    "🏁 Match {} finished {}:{} - winner {}",
                    message.match_guid, message.home_score, message.away_score, winner
                ),
                None => info!(
                    "🏁 Match {} finished {}:{} - draw",
                    message.match_guid, message.home_score, message.away_score
                ),
            }

            if let Some(stream) = &redis_stream {
                if let Err(e) = stream.publish(&message).await {
                    error!(
                        "❌ Failed to publish result for match {}: {}",
                        message.match_guid, e
                    );
                }
            }
        }
    });

    info!("✅ All services started successfully");
    info!("⌨️  Press Ctrl+C to stop");

    // Keep the application running
    tokio::signal::ctrl_c().await?;
    info!("👋 Shutting down gracefully");

    // Clean shutdown; armed timers are in-memory only and will be
    // re-discovered from the store on the next start.
    poller_handle.abort();
    consumer_handle.abort();

    Ok(())
}

/// Seeds arenas and a small competition so an in-memory run exercises the
/// whole pipeline end to end.
async fn seed_demo_data(store: &InMemoryMatchStore) -> Result<Uuid> {
    for (country_code, city, arena) in [
        ("CZE", "Praha", "O2 Arena"),
        ("CZE", "Brno", "Winning Group Arena"),
        ("CZE", "Ostrava", "Ostravar Aréna"),
    ] {
        store.save_arena(Arena::new(country_code, city, arena)).await?;
    }

    let today = Local::now().date_naive();
    let teams: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let competition = store
        .save_competition(Competition::new(
            "Demo League".to_string(),
            today,
            today + Days::new(2),
            teams,
        ))
        .await?;

    if competition.is_started() {
        info!("🏒 Demo competition '{}' is already underway", competition.name);
    }

    Ok(competition.guid)
}

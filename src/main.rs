//! # Universe Signs Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts
//! the session sweeper and the health server, and runs the Telegram bot.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use universe_signs_bot::bot::conversation::ConversationController;
use universe_signs_bot::bot::handlers::{BotContext, BotHandler};
use universe_signs_bot::config::Config;
use universe_signs_bot::database::connection::DatabaseManager;
use universe_signs_bot::services::health::HealthService;
use universe_signs_bot::services::report::{ReportFormat, StatsReportBuilder};
use universe_signs_bot::services::session_store::{InMemorySessionStore, SessionStore};
use universe_signs_bot::services::session_sweeper::SessionSweeper;
use universe_signs_bot::services::subscription::SubscriptionGate;
use universe_signs_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "universe_signs_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Universe Signs Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Session TTL: {} min",
        config.database_url, config.http_port, config.session_ttl_minutes
    );

    // Initialize database
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    log_system_event("database_ready", None);

    // Statistics flow
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
        chrono::Duration::minutes(config.session_ttl_minutes),
    ));
    let reports = Arc::new(StatsReportBuilder::new(
        db_arc.clone(),
        ReportFormat {
            date_format: config.report_date_format.clone(),
        },
    ));
    let conversation = Arc::new(ConversationController::new(sessions.clone(), reports.clone()));

    let gate = SubscriptionGate::new(&config.required_channel_ids);
    if gate.is_enabled() {
        log_system_event(
            "subscription_gate",
            Some(&format!("{} channels", config.required_channel_ids.len())),
        );
    }

    // Initialize bot
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(BotContext {
        db: db_arc.as_ref().clone(),
        conversation,
        reports,
        gate,
    });
    info!("Telegram bot initialized successfully");

    // Sweep abandoned flows
    let mut sweeper = match SessionSweeper::new(sessions.clone()).await {
        Ok(sweeper) => sweeper,
        Err(e) => {
            tracing::error!("Failed to create session sweeper: {}", e);
            return Err(anyhow::anyhow!("Failed to create session sweeper: {}", e));
        }
    };
    if let Err(e) = sweeper.start().await {
        tracing::error!("Failed to start session sweeper: {}", e);
    }

    // Health server
    let health_service = HealthService::new(db_arc.clone(), sessions);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = sweeper.stop().await {
        tracing::warn!("Error stopping session sweeper: {}", e);
    }

    log_system_event("shutdown", None);
    Ok(())
}

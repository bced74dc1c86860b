//! Fitness Hub server.
//!
//! Serves the Mini App JSON API, the Click callbacks and the Telegram
//! webhook. Without `database.url` it runs on in-memory stores seeded with a
//! sample catalog.

use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fitness_hub::adapters::auth::JwtSessionManager;
use fitness_hub::adapters::click::ClickPaymentGateway;
use fitness_hub::adapters::http::{build_router, with_http_layers, AppPorts, AppSettings};
use fitness_hub::adapters::memory::{
    InMemoryActivityLog, InMemoryCatalog, InMemoryFavoriteRepository,
    InMemoryPaymentMethodRepository, InMemoryPaymentRepository, InMemoryProfileRepository,
    InMemorySubscriptionRepository, InMemoryWorkoutSessionRepository,
};
use fitness_hub::adapters::postgres::{
    connect_pool, run_migrations, PostgresActivityLog, PostgresCatalogReader,
    PostgresFavoriteRepository, PostgresPaymentMethodRepository, PostgresPaymentRepository,
    PostgresProfileRepository, PostgresSubscriptionRepository, PostgresWorkoutSessionRepository,
};
use fitness_hub::adapters::telegram::{LogNotifier, TelegramNotifier};
use fitness_hub::config::{AppConfig, ConfigError, ValidationError};
use fitness_hub::domain::foundation::DomainError;
use fitness_hub::ports::{Notifier, PaymentError, PaymentGateway};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("database: {0}")]
    Database(#[from] DomainError),

    #[error("payment gateway: {0}")]
    Gateway(#[from] PaymentError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "fitness-hub failed");
        eprintln!("fitness-hub: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        database = config.database.url.is_some(),
        "starting fitness-hub"
    );

    let gateway: Arc<dyn PaymentGateway> = Arc::new(ClickPaymentGateway::new(&config.click)?);
    let notifier: Arc<dyn Notifier> = match &config.telegram.bot_token {
        Some(token) => Arc::new(TelegramNotifier::new(token)),
        None => {
            tracing::warn!("no telegram bot token configured, notifications go to the log");
            Arc::new(LogNotifier)
        }
    };
    let sessions = Arc::new(JwtSessionManager::from_config(&config.auth));

    let ports = match &config.database.url {
        Some(url) => {
            let pool = connect_pool(&config.database, url).await?;
            if config.database.run_migrations {
                run_migrations(&pool).await?;
            }
            AppPorts {
                profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
                catalog: Arc::new(PostgresCatalogReader::new(pool.clone())),
                favorites: Arc::new(PostgresFavoriteRepository::new(pool.clone())),
                workouts: Arc::new(PostgresWorkoutSessionRepository::new(pool.clone())),
                subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
                payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
                payment_methods: Arc::new(PostgresPaymentMethodRepository::new(pool.clone())),
                activity: Arc::new(PostgresActivityLog::new(pool)),
                notifier,
                gateway,
                session_issuer: sessions.clone(),
                session_validator: sessions,
            }
        }
        None => {
            tracing::warn!("no database configured, using in-memory stores");
            let catalog = Arc::new(InMemoryCatalog::sample());
            AppPorts {
                profiles: Arc::new(InMemoryProfileRepository::new()),
                favorites: Arc::new(InMemoryFavoriteRepository::new(catalog.clone())),
                catalog,
                workouts: Arc::new(InMemoryWorkoutSessionRepository::new()),
                subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
                payments: Arc::new(InMemoryPaymentRepository::new()),
                payment_methods: Arc::new(InMemoryPaymentMethodRepository::new()),
                activity: Arc::new(InMemoryActivityLog::new()),
                notifier,
                gateway,
                session_issuer: sessions.clone(),
                session_validator: sessions,
            }
        }
    };

    let settings = AppSettings::from_config(&config);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if config.subscription.renewal_job_enabled {
        let scheduler =
            ports.billing_scheduler(&settings.policy, config.subscription.job_interval());
        Some(tokio::spawn(async move { scheduler.run(shutdown_rx).await }))
    } else {
        tracing::info!("renewal job disabled");
        None
    };

    let app = with_http_layers(build_router(&ports, &settings), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if shutdown_tx.send(true).is_err() {
        tracing::debug!("scheduler already stopped");
    }
    if let Some(handle) = scheduler {
        if let Err(err) = handle.await {
            tracing::error!(error = %err, "scheduler task panicked");
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

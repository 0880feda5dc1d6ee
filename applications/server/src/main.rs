/// OpenMusic Server - playlist service with asynchronous exports
use clap::{Parser, Subcommand};
use openmusic_cache::{RedisStore, ResilientCache};
use openmusic_core::UserId;
use openmusic_export::{AmqpPublisher, JobPublisher, UnconfiguredPublisher};
use openmusic_server::{
    config::{CacheSettings, ExportSettings, ServerConfig},
    create_router,
    services::AuthService,
    state::AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "openmusic-server")]
#[command(about = "OpenMusic playlist service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "OPENMUSIC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Print an access token for a user (development only)
    IssueToken {
        /// User ID to put in the token subject
        #[arg(short, long)]
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openmusic_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Migrate => migrate(&config).await?,
        Commands::IssueToken { user_id } => issue_token(&config, &user_id)?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting OpenMusic Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = openmusic_storage::create_pool(&config.storage.database_url).await?;
    openmusic_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));

    let cache = build_cache(&config.cache).await?;
    let publisher = build_publisher(&config.export);

    let app_state = AppState::new(pool, auth_service, cache, publisher);
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Local-only without a Redis URL, otherwise Redis plus a background probe
async fn build_cache(settings: &CacheSettings) -> anyhow::Result<Arc<ResilientCache>> {
    let capacity = settings.capacity()?;

    let Some(url) = &settings.redis_url else {
        tracing::info!("No Redis URL configured, cache is local-only");
        return Ok(Arc::new(ResilientCache::local_only(capacity)));
    };

    let remote = RedisStore::new(url, settings.connect_timeout())?;
    let cache = Arc::new(ResilientCache::with_remote(Arc::new(remote), capacity));

    // A failed first probe is not fatal; the background probe keeps trying
    let health = cache.probe().await;
    tracing::info!(?health, "Cache initialized");
    cache.spawn_health_probe(settings.probe_interval());

    Ok(cache)
}

fn build_publisher(settings: &ExportSettings) -> Arc<dyn JobPublisher> {
    match &settings.amqp_url {
        Some(url) => {
            tracing::info!(queue = %settings.queue, "Export queue configured");
            Arc::new(
                AmqpPublisher::new(url.clone(), settings.topology(), settings.connect_timeout())
                    .with_publish_timeout(settings.publish_timeout()),
            )
        }
        None => {
            tracing::warn!("No AMQP URL configured, export requests will be refused");
            Arc::new(UnconfiguredPublisher)
        }
    }
}

async fn migrate(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = openmusic_storage::create_pool(&config.storage.database_url).await?;
    openmusic_storage::run_migrations(&pool).await?;
    tracing::info!("Migrations applied");
    Ok(())
}

fn issue_token(config: &ServerConfig, user_id: &str) -> anyhow::Result<()> {
    config.validate()?;
    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );
    let token = auth_service.create_access_token(&UserId::new(user_id))?;
    println!("{}", token);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutting down");
}

/// OpenMusic Export Worker - mails playlist exports from the queue
use clap::Parser;
use lapin::Connection;
use openmusic_export::{connect_with_retry, consume, ExportProcessor, SmtpMailer};
use openmusic_export_worker::{StoreSnapshots, WorkerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "openmusic-export-worker")]
#[command(about = "Consumes playlist export jobs and mails the results", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "OPENMUSIC_WORKER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openmusic_export_worker=info,openmusic_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = WorkerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    tracing::info!("Starting OpenMusic Export Worker");

    let pool = openmusic_storage::create_pool(&config.storage.database_url).await?;
    tracing::info!("Database connected");

    let mailer = SmtpMailer::new(&config.smtp)?;
    tracing::info!(host = %config.smtp.host, port = config.smtp.port, "SMTP relay configured");

    let processor = ExportProcessor::new(StoreSnapshots::new(pool), mailer);
    let topology = config.queue.topology();
    let retry = config.queue.connect_retry();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let connection = tokio::select! {
            connection = connect_with_retry(&config.queue.amqp_url, retry) => connection,
            () = &mut shutdown => break,
        };

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open broker channel");
                tokio::time::sleep(retry).await;
                continue;
            }
        };

        tokio::select! {
            result = consume(&channel, &topology, &processor, config.queue.prefetch) => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Consumer stopped");
                }
            }
            () = &mut shutdown => {
                close(connection).await;
                break;
            }
        }

        // Stream ended or failed; reconnect
        tokio::time::sleep(retry).await;
    }

    tracing::info!("Export worker stopped");
    Ok(())
}

/// Close the broker connection; unsettled deliveries return to the queue
async fn close(connection: Connection) {
    if let Err(e) = connection.close(200, "worker shutdown").await {
        tracing::debug!(error = %e, "Broker connection already closed");
    }
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

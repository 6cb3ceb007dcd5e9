use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paywebhook::application::processor::WebhookProcessor;
use paywebhook::config::WebhookConfig;
use paywebhook::infrastructure::http::HttpDispatcher;
use paywebhook::infrastructure::in_memory::InMemoryLedger;
use paywebhook::interfaces::http::{AppState, TOKEN_HEADER, create_router};
use paywebhook::logging::{self, LogFormat};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook intake server.
    Serve(ServeArgs),
    /// Post a single sample webhook to a running server.
    Send(SendArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// JSON config file. Omitted keys use built-in defaults.
    #[arg(long, short = 'c', env = "WEBHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Shared secret expected in the X-Webhook-Token header.
    #[arg(long, env = "WEBHOOK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Address to listen on.
    #[arg(long, env = "WEBHOOK_BIND")]
    bind: Option<SocketAddr>,

    /// Destination for confirmations.
    #[arg(long, env = "WEBHOOK_CONFIRMATION_URL")]
    confirmation_url: Option<String>,

    /// Destination for cancellations.
    #[arg(long, env = "WEBHOOK_CANCELLATION_URL")]
    cancellation_url: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl ServeArgs {
    /// File first, then flags and environment on top.
    fn load_config(&self) -> Result<WebhookConfig> {
        let mut config = match &self.config {
            Some(path) => WebhookConfig::from_file(path).into_diagnostic()?,
            None => WebhookConfig::default(),
        };
        if let Some(token) = &self.token {
            config.token = token.clone();
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(url) = &self.confirmation_url {
            config.confirmation_url = url.clone();
        }
        if let Some(url) = &self.cancellation_url {
            config.cancellation_url = url.clone();
        }
        config.validate().into_diagnostic()?;
        Ok(config)
    }
}

#[derive(Args)]
struct SendArgs {
    /// Webhook endpoint.
    #[arg(long, default_value = "http://localhost:5000/webhook")]
    url: String,

    #[arg(long, env = "WEBHOOK_TOKEN", hide_env_values = true)]
    token: String,

    #[arg(long, default_value = "payment_success")]
    event: String,

    #[arg(long, default_value = "abc123")]
    transaction_id: String,

    #[arg(long, default_value = "49.90")]
    amount: String,

    #[arg(long, default_value = "BRL")]
    currency: String,

    #[arg(long, default_value = "2023-10-01T12:00:00Z")]
    timestamp: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Send(args) => send(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    logging::init_logging(logging::DEFAULT_FILTER, args.log_format);

    let config = args.load_config()?;

    let dispatcher = HttpDispatcher::new(
        config.confirmation_url().into_diagnostic()?,
        config.cancellation_url().into_diagnostic()?,
        config.dispatch_timeout(),
    )
    .into_diagnostic()?;

    let processor = WebhookProcessor::new(
        config.token.clone(),
        config.validator(),
        Box::new(InMemoryLedger::new()),
        Box::new(dispatcher),
    );
    let router = create_router(AppState::new(processor).with_body_limit(config.max_body_bytes));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .into_diagnostic()?;
    tracing::info!(
        bind = %config.bind,
        confirmation_url = %config.confirmation_url,
        cancellation_url = %config.cancellation_url,
        "webhook server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    tracing::info!("webhook server stopped");
    Ok(())
}

async fn send(args: SendArgs) -> Result<()> {
    let body = serde_json::json!({
        "event": args.event,
        "transaction_id": args.transaction_id,
        "amount": args.amount,
        "currency": args.currency,
        "timestamp": args.timestamp,
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()
        .into_diagnostic()?;
    let response = client
        .post(&args.url)
        .header(TOKEN_HEADER, &args.token)
        .json(&body)
        .send()
        .await
        .into_diagnostic()?;

    let status = response.status();
    let text = response.text().await.into_diagnostic()?;
    println!("{} {}", status.as_u16(), text);
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received, draining connections");
}

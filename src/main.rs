//! Sale Audit webhook server
//!
//! Serves the sale webhook and a liveness probe.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sale_audit::{AppConfig, GroqGenerator, OrderProcessor, ResendMailer};
use tower_http::trace::TraceLayer;

/// Sale Audit webhook server
#[derive(Parser, Debug)]
#[command(name = "sale-audit")]
#[command(author = "Cyrnel Origin <audits@cyrnelorigin.online>")]
#[command(version)]
#[command(about = "Turns sale webhooks into emailed automation audits")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8888")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env().context("loading provider credentials")?;
    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    let processor = OrderProcessor::new(
        Arc::new(GroqGenerator::new(http.clone(), config.groq_api_key)),
        Arc::new(ResendMailer::new(http, config.resend_api_key)),
    );
    let app = sale_audit::router(Arc::new(processor)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(
        "Sale Audit server v{} listening on {}",
        sale_audit::VERSION,
        addr
    );

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}

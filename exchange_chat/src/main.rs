use anyhow::Context;
use arguments::Arguments;
use audit::AuditLog;
use clap::Parser;
use command::TOO_MANY_DAYS;
use privat_rates::{CurrencySet, RateClient, RateFetchService, MAX_DAYS};
use server::CommandServer;
use std::{process::ExitCode, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod arguments;
mod audit;
mod command;
mod registry;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Arguments::parse();
    if args.days > MAX_DAYS {
        println!("{TOO_MANY_DAYS}");
        return Ok(ExitCode::FAILURE);
    }

    let client = RateClient::new(&args.api_url, args.timeout.into())
        .context("Failed to build HTTP client")?;
    let service = RateFetchService::new(client, CurrencySet::new(&args.currencies));

    if !args.serve_only {
        let rates = service.fetch_last_days(args.days).await;
        println!("{rates}");
    }

    let listener = TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("Failed to listen on {}", args.listen))?;
    let server = Arc::new(CommandServer::new(service, AuditLog::new(args.audit_log)));
    server.serve(listener).await?;

    Ok(ExitCode::SUCCESS)
}

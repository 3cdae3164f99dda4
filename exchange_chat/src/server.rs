use crate::{
    audit::{AuditLog, AuditLogEntry},
    command::{Command, CommandInvocation},
    registry::{ConnectedClient, ConnectionRegistry},
};
use anyhow::Context;
use futures::{future, Sink, SinkExt, Stream, StreamExt, TryStreamExt};
use privat_rates::{RateFetchService, RateSource};
use std::{fmt, sync::Arc};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::{self, Message};

pub const NO_RATES: &str = "No rates available";

/// What a single line of input amounts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Silent,
    Rejected(String),
    Executed { reply: String, entry: AuditLogEntry },
}

#[derive(Debug)]
pub struct CommandServer<S> {
    service: RateFetchService<S>,
    registry: ConnectionRegistry,
    audit: AuditLog,
}

impl<S> CommandServer<S>
where
    S: RateSource + 'static,
{
    pub fn new(service: RateFetchService<S>, audit: AuditLog) -> Self {
        Self {
            service,
            registry: ConnectionRegistry::default(),
            audit,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        tracing::info!("Listening on {}", listener.local_addr()?);
        loop {
            let (stream, addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {e}");
                    continue;
                }
            };
            let server = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = server.accept_websocket(stream, addr).await {
                    tracing::warn!("Connection {addr} ended with error: {e:#}");
                }
            });
        }
    }

    async fn accept_websocket(&self, stream: TcpStream, addr: ConnectedClient) -> anyhow::Result<()> {
        let websocket = tokio_tungstenite::accept_async(stream)
            .await
            .context("Websocket handshake failed")?;
        let (writer, reader) = websocket.split();
        let reader = reader.try_filter_map(move |msg| {
            future::ready(Ok(match msg {
                Message::Text(text) => Some(text),
                other => {
                    tracing::debug!("Ignoring non-text message from {addr}: {other:?}");
                    None
                }
            }))
        });
        let writer =
            writer.with(|text: String| future::ready(Ok::<_, tungstenite::Error>(Message::Text(text))));
        self.handle_connection(reader, writer, addr).await
    }

    /// Handles one command at a time until the client goes away. A failed
    /// read ends only this connection.
    pub async fn handle_connection<R, W, E>(
        &self,
        mut reader: R,
        mut writer: W,
        addr: ConnectedClient,
    ) -> anyhow::Result<()>
    where
        R: Stream<Item = Result<String, E>> + Unpin,
        E: fmt::Display,
        W: Sink<String> + Unpin,
        W::Error: std::error::Error + Send + Sync + 'static,
    {
        let _registration = self.registry.register(addr);
        tracing::info!("{addr} connected, {} online", self.registry.len());
        tracing::debug!("Connected clients: {:?}", self.registry.snapshot());

        while let Some(msg) = reader.next().await {
            let line = match msg {
                Ok(line) => line,
                Err(e) => {
                    tracing::info!("{addr} dropped: {e}");
                    break;
                }
            };
            match self.execute(&line).await {
                Outcome::Silent => {}
                Outcome::Rejected(reply) => writer.send(reply).await?,
                Outcome::Executed { reply, entry } => {
                    writer.send(reply).await?;
                    self.record(&entry).await;
                }
            }
        }

        tracing::info!("{addr} disconnected");
        Ok(())
    }

    pub async fn execute(&self, line: &str) -> Outcome {
        let Some(invocation) = CommandInvocation::parse(line) else {
            return Outcome::Silent;
        };
        match invocation.command() {
            Ok(Command::Exchange { days }) => {
                let rates = self.service.fetch_last_days(days).await;
                let reply = if rates.is_empty() {
                    NO_RATES.to_string()
                } else {
                    rates.to_string()
                };
                Outcome::Executed {
                    reply,
                    entry: AuditLogEntry::now(invocation.name, invocation.params),
                }
            }
            Err(rejection) => {
                tracing::info!("Rejected {invocation:?}: {rejection}");
                Outcome::Rejected(rejection.to_string())
            }
        }
    }

    /// An unwritable log drops the entry, the connection carries on.
    async fn record(&self, entry: &AuditLogEntry) {
        if let Err(e) = self.audit.append(entry).await {
            tracing::error!("Failed to write audit entry '{entry}': {e}");
        }
    }
}

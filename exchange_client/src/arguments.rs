use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Arguments {
    /// Websocket address of the exchange chat server
    #[arg(short, long, default_value = "ws://127.0.0.1:8765")]
    pub address: String,
}

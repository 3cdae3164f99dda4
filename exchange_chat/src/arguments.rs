use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about = "Serve PrivatBank exchange rates over a websocket chat")]
pub struct Arguments {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8765")]
    pub listen: String,

    /// Number of days for the startup report (max 10)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,

    /// Currencies to report
    #[arg(short, long, num_args = 1.., default_values = ["USD", "EUR"])]
    pub currencies: Vec<String>,

    /// Archive endpoint of the rate API
    #[arg(long, default_value = privat_rates::DEFAULT_API_URL)]
    pub api_url: String,

    /// Upper bound for a single rate request
    #[arg(short, long, default_value = "10s")]
    pub timeout: humantime::Duration,

    /// File that executed commands are appended to
    #[arg(short, long, default_value = "exchange.log")]
    pub audit_log: PathBuf,

    /// Skip the startup report and only serve
    #[arg(long)]
    pub serve_only: bool,
}

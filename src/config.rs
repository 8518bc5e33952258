use clap::Parser;
use std::net::SocketAddr;

/// Runtime configuration, from command-line flags or environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "GATEWAY_BIND_ADDR", default_value = "0.0.0.0:8090")]
    pub bind_addr: SocketAddr,

    /// Base URL of the acquiring bank
    #[arg(long, env = "BANK_URL", default_value = "http://localhost:8080")]
    pub bank_url: String,

    /// Extra bank call attempts after the initial one
    #[arg(long, env = "BANK_MAX_RETRIES", default_value_t = 1)]
    pub max_retries: u32,

    /// Base delay between bank call retries, in milliseconds
    #[arg(long, env = "BANK_RETRY_DELAY_MS", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Supported ISO 4217 currency codes
    #[arg(
        long,
        env = "SUPPORTED_CURRENCIES",
        value_delimiter = ',',
        default_value = "USD,GBP,EUR"
    )]
    pub currencies: Vec<String>,
}

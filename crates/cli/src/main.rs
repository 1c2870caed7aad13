use clap::Parser;
use ferrous_forward_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-forward")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Forward - DNS forwarder that splits multi-question queries")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Upstream resolver (HOST:PORT or udp://HOST:PORT)
    #[arg(short = 'r', long, value_name = "HOST:PORT")]
    resolver: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        resolver: cli.resolver,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Forward v{}", env!("CARGO_PKG_VERSION"));

    let stats = server::start_dns_server(&config).await?;

    info!(
        groups_completed = stats.groups_completed,
        groups_failed = stats.groups_failed,
        "Server shutdown complete"
    );
    Ok(())
}

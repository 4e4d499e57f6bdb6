use barrage_core::RunConfig;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::FmtSubscriber;

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser, Debug)]
#[command(version, about = "HTTP load benchmark service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the benchmark API.
    Serve {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Run a one-shot GET benchmark and print the report as JSON.
    Run {
        #[arg(long)]
        url: String,
        #[arg(long)]
        qps: u32,
        #[arg(long)]
        num_workers: u32,
        #[arg(long, default_value_t = 10.0)]
        duration: f64,
        #[arg(long, default_value_t = 2.0)]
        timeout: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    match Cli::parse().command {
        Command::Serve { port } => barrage_server::server_task(port).await?,
        Command::Run {
            url,
            qps,
            num_workers,
            duration,
            timeout,
        } => {
            if duration <= 0.0 || timeout <= 0.0 {
                anyhow::bail!("duration and timeout must be positive");
            }
            let config = RunConfig::new(
                url,
                qps,
                num_workers,
                Duration::from_secs_f64(duration),
                Duration::from_secs_f64(timeout),
            );
            let report = barrage::run(config).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

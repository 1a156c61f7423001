use anyhow::Result;
use clap::Parser;
use devup::{Config, Supervisor};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "devup")]
#[command(about = "Launch the backend and frontend dev servers together", long_about = None)]
struct Args {}

#[tokio::main]
async fn main() {
    let _args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("[devup] {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    let config = Config::load(&root);

    let mut supervisor = Supervisor::new(config);
    supervisor.run().await
}

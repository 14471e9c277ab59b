mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nichecast::config::EngineConfig;
use nichecast::engine::Engine;
use nichecast::{format_float, format_number};

#[derive(Parser)]
#[command(name = "nichecast", about = "Niche scoring and adaptive recommendation engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Serve(ServeArgs),
    Rank(RankArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8787)]
    pub port: u16,
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
    #[arg(long, default_value = "media")]
    pub media_dir: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct RankArgs {
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    #[arg(long, default_value_t = 5)]
    limit: usize,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => server::serve(args).await,
        Command::Rank(args) => run_rank(args).await,
    }
}

async fn run_rank(args: RankArgs) -> Result<(), String> {
    let (config, _) = EngineConfig::load(args.config).map_err(|err| err.to_string())?;
    let engine = Engine::load(config, &args.data_dir)
        .await
        .map_err(|err| err.to_string())?;

    let ranked = engine.recommended(args.limit).await;
    if ranked.is_empty() {
        println!("No niches yet: add trends first.");
        return Ok(());
    }

    for (position, niche) in ranked.iter().enumerate() {
        let flag = if niche.trending { " [trending]" } else { "" };
        println!(
            "{}. {}{} — score {} | trends {} | avg views {} | avg revenue {}",
            position + 1,
            niche.name,
            flag,
            format_float(niche.profitability_score, 1),
            niche.trend_count,
            format_number(niche.avg_views),
            format_float(niche.avg_revenue, 2)
        );
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchthis_rs::catalog::import_movies;
use watchthis_rs::config::Config;
use watchthis_rs::db::SqliteRepository;

#[derive(Parser, Debug)]
#[command(name = "watchthis-seed")]
#[command(about = "Reset and reload the movie catalog from MovieLens", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "watchthis.yaml")]
    config: String,
    /// Override the movies.csv path from the config file.
    #[arg(short, long)]
    source: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchthis_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(e) = seed(&args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn seed(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_file(&args.config)?;
    let source = args
        .source
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.movies_csv));

    let repo = SqliteRepository::new(&config.database_path()).await?;
    let count = import_movies(&repo, &source).await?;

    println!("Imported {} movies", count);
    Ok(())
}

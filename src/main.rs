use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibliodesk::domain::CirculationPolicy;
use bibliodesk::infrastructure::Gateway;
use bibliodesk::{cli, config, seed};

/// Library catalog and circulation desk
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database URL; overrides DATABASE_URL and DB_NAME
    #[arg(long)]
    database_url: Option<String>,
    /// Insert demo categories, a librarian and a book before starting
    #[arg(long, env = "SEED_DEMO")]
    seed_demo: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bibliodesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = config::Config::from_env();
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    tracing::info!("Opening library database {}", config.database_url);

    // The only fatal failure: no store, no program
    let gateway = match Gateway::open(&config.database_url).await {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!("Error connecting to database {}: {}", config.database_url, e);
            eprintln!("Error connecting to the database: {}", e);
            std::process::exit(1);
        }
    };

    if args.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(gateway.conn()).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = cli::run(&gateway, CirculationPolicy::default(), stdin, std::io::stdout()).await {
        tracing::error!("Menu stopped: {}", e);
    }

    if let Err(e) = gateway.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }
}

//! Seeder console.
//!
//! Run with:
//! ```
//! cargo run -p seeding --bin seeding -- seed:list
//! cargo run -p seeding --bin seeding -- --memory seed -v
//! ```

use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use seeding::prelude::*;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use users::PgStore;

#[derive(Parser, Debug)]
#[command(name = "seeding")]
#[command(about = "Lists and runs fixture seeders", long_about = None)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Seed into an in-memory store instead of Postgres
    #[arg(long, global = true)]
    memory: bool,

    /// Number of users the users seeder inserts
    #[arg(long, env = "SEED_USER_COUNT", global = true)]
    user_count: Option<usize>,

    /// Rows per bulk insert chunk
    #[arg(long, env = "SEED_CHUNK_SIZE", global = true)]
    chunk_size: Option<usize>,

    /// Seed for reproducible fake data
    #[arg(long, env = "SEED_RNG_SEED", global = true)]
    rng_seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the named seeders, or all of them
    Seed {
        /// Seeder to run; repeat for several
        #[arg(short = 'n', long = "name", value_name = "NAME")]
        names: Vec<String>,

        /// Print every produced item as JSON
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },
    /// List the registered seeders
    #[command(name = "seed:list")]
    List,
}

impl Cli {
    fn config(&self) -> SeedConfig {
        let mut config = SeedConfig::default();
        if let Some(count) = self.user_count {
            config = config.with_user_count(count);
        }
        if let Some(size) = self.chunk_size {
            config = config.with_chunk_size(size);
        }
        if let Some(seed) = self.rng_seed {
            config = config.with_rng_seed(seed);
        }
        config
    }

    async fn services(&self) -> anyhow::Result<Services> {
        let config = self.config();

        if self.memory {
            tracing::info!("Using in-memory store");
            let (services, _store) = Services::in_memory(config);
            return Ok(services);
        }

        let Some(database_url) = self.database_url.as_deref() else {
            bail!("DATABASE_URL is not set; pass --database-url or --memory");
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        tracing::info!("Connected to database");

        users::database::migrate(&pool).await?;

        let store = Arc::new(PgStore::new(pool));
        Ok(Services::new(config)
            .with_user_repository(store.clone())
            .with_address_repository(store))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let services = cli.services().await?;
    let mut app = Seeding::boot(services).with_default_seeders();

    let (command, verbosity) = match cli.command {
        Commands::Seed { names, verbose } => (Command::Seed(SeedCommand::new(names)), verbose),
        Commands::List => (Command::List, 0),
    };

    let mut io = ConsoleIo::new(std::io::stdout()).with_verbosity(verbosity);
    let code = app.run_command(command, &mut io).await?;

    std::process::exit(code);
}

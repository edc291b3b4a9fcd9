//! Sapi Seto back office - demo data loader
//!
//! Replaces everything in the configured database with the demo shop.

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sapi_seto_backend::{services::SeedService, Config};

/// bcrypt cost for the seeded accounts
const SEED_BCRYPT_COST: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sapi_seto_backend=info,sapi_seto_seed=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Seeding database for environment {}", config.environment);

    let db_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let report = SeedService::new(db_pool)
        .run(SEED_BCRYPT_COST)
        .await
        .map_err(|e| anyhow::anyhow!("Seeding failed: {}", e))?;

    tracing::info!(?report, "Seeding finished");
    Ok(())
}

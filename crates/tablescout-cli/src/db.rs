//! `db` subcommands: connectivity, migrations and seeding.

use clap::Subcommand;
use tablescout_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check the database connection
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert restaurants from the configured YAML file
    Seed,
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = tablescout_db::PoolConfig::from_app_config(config);
    Ok(tablescout_db::connect_pool(&config.database_url, pool_config).await?)
}

pub(crate) async fn run(command: DbCommands) -> anyhow::Result<()> {
    let config = tablescout_core::load_app_config()?;
    let pool = connect(&config).await?;

    match command {
        DbCommands::Ping => {
            tablescout_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = tablescout_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => {
            let file = tablescout_core::load_restaurants(&config.restaurants_path)?;
            let summary = tablescout_db::seed_restaurants(&pool, &file.restaurants).await?;
            let active = tablescout_db::count_active_restaurants(&pool).await?;
            println!(
                "seeded {} restaurant(s) from {}: {} new, {} updated; {active} active",
                summary.total(),
                config.restaurants_path.display(),
                summary.inserted,
                summary.updated,
            );
        }
    }

    Ok(())
}

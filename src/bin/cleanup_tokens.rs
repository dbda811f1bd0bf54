//! One-off purge of stale refresh tokens and deny-listed access tokens.
//!
//! Intended for cron when the server's periodic cleanup is not enough.

use chrono::Utc;
use dotenvy::dotenv;

use contacts_api::db::{establish_connection_pool, run_migrations};
use contacts_api::load_server_config;
use contacts_api::repository::DieselRepository;
use contacts_api::services::maintenance::cleanup_expired_tokens;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_server_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_migrations(&pool) {
        log::error!("{err}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    match cleanup_expired_tokens(
        &repo,
        Utc::now(),
        server_config.revoked_token_retention_days,
    ) {
        Ok(purged) => log::info!("Token cleanup removed {purged} rows"),
        Err(err) => {
            log::error!("Token cleanup failed: {err}");
            std::process::exit(1);
        }
    }
}

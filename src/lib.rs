#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "data")]
mod error_conversions;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod jobs;
#[cfg(feature = "server")]
pub mod rate_limit;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{load_server_config, run};

#[cfg(feature = "server")]
mod server {
    use std::env;
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};
    use config::{Config, ConfigError, Environment};

    use crate::auth::jwt::JwtService;
    use crate::db::{establish_connection_pool, run_migrations};
    use crate::jobs::spawn_token_cleanup;
    use crate::models::config::ServerConfig;
    use crate::rate_limit::ClientRateLimiter;
    use crate::repository::DieselRepository;
    use crate::routes;

    /// Layers `config/default.yaml`, the `APP_ENV` profile and `APP_*` variables.
    ///
    /// `secret_key` has no default; loading fails unless it is provided.
    pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
        // Select config profile (defaults to `local`).
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        load_layered_config(&app_env, Environment::with_prefix("APP"))
    }

    fn load_layered_config(
        app_env: &str,
        environment: Environment,
    ) -> Result<ServerConfig, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize::<ServerConfig>()
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let applied = run_migrations(&pool).map_err(std::io::Error::other)?;
        log::info!("Applied {applied} pending migrations");

        let repo = DieselRepository::new(pool);

        let jwt = JwtService::from_config(&server_config)
            .map_err(|e| std::io::Error::other(format!("Invalid token settings: {e}")))?;

        let limiter = ClientRateLimiter::per_minute(server_config.me_rate_limit_per_minute);

        spawn_token_cleanup(
            repo.clone(),
            limiter.clone(),
            Duration::from_secs(server_config.token_cleanup_interval_secs),
            server_config.revoked_token_retention_days,
        );

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(jwt.clone()))
                .app_data(web::Data::new(limiter.clone()))
                .app_data(web::Data::new(server_config.clone()))
                .configure(routes::configure)
        })
        .bind(bind_address)?
        .run()
        .await
    }

}

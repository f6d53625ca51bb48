use axum::routing::{get, post};
use axum::Router;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reelmate_shared::middleware::init_tracing("reelmate-server");

    let config = AppConfig::load()?;
    let port = config.port;

    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let db = Pool::builder().max_size(10).build(manager)?;

    {
        let mut conn = db.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("running migrations failed: {e}"))?;
        for migration in &applied {
            tracing::info!(migration = %migration, "applied migration");
        }
    }

    let state = Arc::new(AppState { db, config });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/movies", get(routes::movies::list_movies))
        .route("/api/movies/:id", get(routes::movies::get_movie))
        .route(
            "/api/swipes",
            post(routes::swipes::create_swipe).get(routes::swipes::list_swipes),
        )
        .route("/api/matches", get(routes::matches::list_matches))
        .route("/api/matches/:id", get(routes::matches::get_match))
        .route(
            "/api/users/partner",
            post(routes::partner::set_partner)
                .get(routes::partner::get_partner)
                .delete(routes::partner::remove_partner),
        )
        .route("/api/users/search", get(routes::partner::search_user))
        .route(
            "/api/users/partner-requests",
            post(routes::partner_requests::create_request)
                .get(routes::partner_requests::list_requests),
        )
        .route(
            "/api/users/partner-requests/pending",
            get(routes::partner_requests::list_pending),
        )
        .route(
            "/api/users/partner-requests/respond",
            post(routes::partner_requests::respond),
        )
        .fallback(routes::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "reelmate-server starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

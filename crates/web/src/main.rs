use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::scores::handlers::submit_score,
        features::scores::handlers::list_scores,
        features::scores::handlers::override_score,
        features::leaderboard::handlers::get_group_leaderboard,
        features::leaderboard::handlers::get_handicap,
        features::tournaments::handlers::list_tournaments,
        features::tournaments::handlers::generate_majors,
        features::tournaments::handlers::generate_birthday,
        features::tournaments::handlers::tournament_leaderboard,
        features::tournaments::handlers::apply_cut,
        features::tournaments::handlers::finalize_tournament,
        features::tournaments::handlers::upsert_birthday_preferences,
        features::tournaments::handlers::sweep_activation,
    ),
    components(
        schemas(
            storage::dto::score::SubmitScoreRequest,
            storage::dto::score::OverrideScoreRequest,
            storage::dto::score::ScoreResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::PlayerSummary,
            storage::dto::leaderboard::HandicapResponse,
            storage::dto::tournament::GenerateMajorsRequest,
            storage::dto::tournament::GenerateBirthdayRequest,
            storage::dto::tournament::AsOfRequest,
            storage::dto::tournament::FinalizeRequest,
            storage::dto::tournament::BirthdayPreferencesRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::tournament::TournamentStanding,
            storage::dto::tournament::TournamentLeaderboardResponse,
            storage::dto::tournament::SweepResponse,
            storage::dto::tournament::CutResponse,
            storage::models::Player,
            storage::models::ScoreRecord,
            storage::models::HandicapRecord,
            storage::models::Tournament,
            storage::models::TournamentParticipant,
            storage::models::BirthdayPreferences,
            storage::models::MajorTemplate,
        )
    ),
    tags(
        (name = "scores", description = "Daily score submission"),
        (name = "leaderboard", description = "Group leaderboards and handicaps"),
        (name = "tournaments", description = "Tournament scheduling and standings"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Puzzle Golf API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .nest("/api/scores", features::scores::routes::routes())
        .nest("/api/groups", features::leaderboard::routes::routes())
        .nest("/api/tournaments", features::tournaments::routes::routes())
        .nest(
            "/api/admin/tournaments",
            features::tournaments::routes::admin_routes(),
        )
        .layer(cors)
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}

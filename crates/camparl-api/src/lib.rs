//! REST API and syndication feed server for the parliamentary data platform

mod cache;
mod error;
mod extract;
mod feeds;
mod middleware;
mod models;
mod ratelimit;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware as axum_mw;
use axum::routing::{delete, get, post};
use axum::Router;
use camparl_db::Database;
use color_eyre::eyre::Result;
use dashmap::DashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use cache::Cache;
use ratelimit::HourlyLimiter;

/// Application state shared across every handler.
pub struct AppState {
    pub db: Database,
    pub cache: Cache,

    /// Per-API-key hourly buckets, keyed by `ApiKey::id`.
    pub key_limiters: DashMap<Uuid, Arc<HourlyLimiter>>,

    /// Feed rate limiting and cache-rebuild state. Every feed scope shares
    /// one rendered body across RSS and Atom requests, so the rebuild
    /// budget is keyed by scope path, not by format.
    pub feed_rebuild_limiters: DashMap<String, Arc<HourlyLimiter>>,
    pub feed_ip_limiters: DashMap<String, Arc<HourlyLimiter>>,
    pub feed_token_limiters: DashMap<String, Arc<HourlyLimiter>>,
    pub feed_global_limiter: Arc<HourlyLimiter>,
    pub feed_rebuild_budget: u32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        routes::list_bills,
        routes::get_bill,
        routes::search_bills,
        routes::list_politicians,
        routes::get_politician,
        routes::list_votes,
        routes::get_vote,
        routes::list_vote_records,
        routes::list_committees,
        routes::get_committee,
        routes::list_committee_meetings,
        routes::list_debates,
        routes::get_debate,
        routes::list_speeches,
        routes::search,
        routes::ignore_bill,
        routes::unignore_bill,
        routes::list_ignored,
        routes::create_feed_token,
        routes::revoke_feed_token,
    ),
    components(schemas(
        models::Localized,
        models::BillResponse,
        models::PoliticianResponse,
        models::VoteResponse,
        models::VoteRecordResponse,
        models::CommitteeResponse,
        models::CommitteeMeetingResponse,
        models::DebateResponse,
        models::SpeechResponse,
        models::IgnoredBillResponse,
        models::FeedTokenResponse,
        models::HealthResponse,
    )),
    info(
        title = "Camparl API",
        description = "Read-only REST API and syndication feeds over Canadian federal parliamentary data",
        version = "0.1.0"
    )
)]
struct ApiDoc;

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Assembles the router and serves it on `PORT` (default 3000) until the
/// process is killed. The CLI's `serve` subcommand and the `camparl-api`
/// binary both call this - one startup path, not two copies of it.
///
/// # Errors
/// Returns an error if the database connection, migrations, or the TCP
/// listener fail to come up.
pub async fn serve() -> Result<()> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);
    let database_url = std::env::var("DATABASE_URL")?;
    let cors_origins = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
    let feed_rebuild_budget = env_u32("FEED_REBUILD_BUDGET_PER_HOUR", 12);
    let feed_global_limit = env_u32("FEED_GLOBAL_LIMIT_PER_HOUR", 1000);

    tracing::info!("Connecting to PostgreSQL...");
    let db = Database::connect(&database_url).await?;

    let state = Arc::new(AppState {
        db,
        cache: Cache::new(10_000),
        key_limiters: DashMap::new(),
        feed_rebuild_limiters: DashMap::new(),
        feed_ip_limiters: DashMap::new(),
        feed_token_limiters: DashMap::new(),
        feed_global_limiter: Arc::new(HourlyLimiter::new(feed_global_limit)),
        feed_rebuild_budget,
    });

    let public_routes = Router::new()
        .route("/health", get(routes::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let protected_routes = Router::new()
        .route("/{jurisdiction}/bills", get(routes::list_bills))
        .route("/{jurisdiction}/bills/search", get(routes::search_bills))
        .route("/{jurisdiction}/bills/{id}", get(routes::get_bill))
        .route("/{jurisdiction}/politicians", get(routes::list_politicians))
        .route("/{jurisdiction}/politicians/{id}", get(routes::get_politician))
        .route("/{jurisdiction}/votes", get(routes::list_votes))
        .route("/{jurisdiction}/votes/{natural_id}", get(routes::get_vote))
        .route("/{jurisdiction}/votes/{natural_id}/records", get(routes::list_vote_records))
        .route("/{jurisdiction}/committees", get(routes::list_committees))
        .route("/{jurisdiction}/committees/{natural_id}", get(routes::get_committee))
        .route("/{jurisdiction}/committees/{natural_id}/meetings", get(routes::list_committee_meetings))
        .route("/{jurisdiction}/debates", get(routes::list_debates))
        .route("/{jurisdiction}/debates/{natural_id}", get(routes::get_debate))
        .route("/{jurisdiction}/debates/{natural_id}/speeches", get(routes::list_speeches))
        .route("/{jurisdiction}/search", get(routes::search))
        .route("/{jurisdiction}/preferences/ignore", post(routes::ignore_bill).delete(routes::unignore_bill))
        .route("/{jurisdiction}/preferences/ignored", get(routes::list_ignored))
        .route("/{jurisdiction}/preferences/feed-token", post(routes::create_feed_token))
        .route("/{jurisdiction}/preferences/feed-token/{token}", delete(routes::revoke_feed_token))
        .layer(axum_mw::from_fn_with_state(state.clone(), middleware::require_api_key));

    let feed_routes = Router::new()
        .route("/{jurisdiction}/all.xml", get(feeds::all_xml))
        .route("/{jurisdiction}/all.atom", get(feeds::all_atom))
        .route("/{jurisdiction}/bills/latest.xml", get(feeds::bills_latest_xml))
        .route("/{jurisdiction}/bills/latest.atom", get(feeds::bills_latest_atom))
        .route("/{jurisdiction}/bills/tag/{tag_ext}", get(feeds::bills_tag))
        .route("/{jurisdiction}/bill/{bill_ext}", get(feeds::bill))
        .route("/{jurisdiction}/mp/{politician_ext}", get(feeds::mp))
        .route("/{jurisdiction}/committee/{committee_ext}", get(feeds::committee))
        .route("/{jurisdiction}/p/{token_ext}", get(feeds::personalized));

    let cors = if cors_origins == "*" {
        CorsLayer::very_permissive()
    } else {
        let origins: Vec<_> = cors_origins.split(',').filter_map(|o| o.trim().parse().ok()).collect();
        CorsLayer::new().allow_origin(origins).allow_methods(tower_http::cors::Any)
    };

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", protected_routes)
        .nest("/feeds", feed_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

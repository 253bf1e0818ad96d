use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use moa_core::domain::opportunity::{MarketingOpportunity, OpportunitySnapshot, StoreCategory};
use moa_core::storage::timelines;
use moa_core::time::MonthWindow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = moa_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let pool: Option<PgPool> = match settings.require_database_url() {
        Ok(db_url) => match sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
        {
            Ok(pool) => match moa_core::storage::migrate(&pool).await {
                Ok(()) => Some(pool),
                Err(e) => {
                    sentry_anyhow::capture_anyhow(&e);
                    tracing::error!(error = %e, "db migrations failed; starting API in degraded mode");
                    None
                }
            },
            Err(e) => {
                let err = anyhow::Error::new(e);
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "db connect failed; starting API in degraded mode");
                None
            }
        },
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "DATABASE_URL missing; starting API in degraded mode");
            None
        }
    };

    let state = AppState { pool };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/timeline/:user_id/latest", get(get_latest_timeline))
        .route("/timeline/:user_id/:year/:month", get(get_monthly_timeline))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    pool: Option<PgPool>,
}

#[derive(Debug, Serialize)]
struct ApiTimeline {
    snapshot_id: Uuid,
    user_id: String,
    window: MonthWindow,
    store_category: StoreCategory,
    generated_at: DateTime<Utc>,
    days: Vec<ApiDay>,
}

/// One calendar cell: the opportunities plus the rollup flags the
/// calendar grid renders without scanning the list.
#[derive(Debug, Serialize)]
struct ApiDay {
    date: NaiveDate,
    has_high_priority: bool,
    total_count: usize,
    opportunities: Vec<MarketingOpportunity>,
}

fn into_api_timeline(snapshot_id: Uuid, snapshot: OpportunitySnapshot) -> ApiTimeline {
    let days = snapshot
        .days
        .into_iter()
        .map(|day| {
            let has_high_priority = day.has_high_priority();
            let total_count = day.total_count();
            ApiDay {
                date: day.date,
                has_high_priority,
                total_count,
                opportunities: day.opportunities,
            }
        })
        .collect();

    ApiTimeline {
        snapshot_id,
        user_id: snapshot.user_id,
        window: snapshot.window,
        store_category: snapshot.store_category,
        generated_at: snapshot.generated_at,
        days,
    }
}

async fn get_latest_timeline(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiTimeline>, StatusCode> {
    let Some(pool) = &state.pool else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let (snapshot_id, snapshot) = timelines::load_latest(pool, &user_id)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(into_api_timeline(snapshot_id, snapshot)))
}

async fn get_monthly_timeline(
    State(state): State<AppState>,
    Path((user_id, year, month)): Path<(String, i32, u32)>,
) -> Result<Json<ApiTimeline>, StatusCode> {
    let Some(pool) = &state.pool else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    if !(1..=12).contains(&month) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let (snapshot_id, snapshot) = timelines::load_for_month(pool, &user_id, year, month)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(into_api_timeline(snapshot_id, snapshot)))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &moa_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

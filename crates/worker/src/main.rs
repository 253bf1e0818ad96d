use anyhow::Context;
use clap::Parser;
use moa_core::domain::calendar::{DaySuggestion, Reminder};
use moa_core::domain::opportunity::OpportunitySnapshot;
use moa_core::ingest::provider::{CalendarDataClient, HttpCalendarClient};
use moa_core::time::MonthWindow;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod stub;

#[derive(Debug, Parser)]
#[command(name = "moa_worker")]
struct Args {
    /// User whose calendar is aggregated.
    #[arg(long)]
    user_id: String,

    /// Target year. Defaults to the current KST month together with --month.
    #[arg(long)]
    year: Option<i32>,

    /// Target month (1-12). Defaults to the current KST month together with --year.
    #[arg(long)]
    month: Option<u32>,

    /// Do everything except writing to the database.
    #[arg(long)]
    dry_run: bool,

    /// Use deterministic stub inputs instead of the calendar backend.
    #[arg(long)]
    stub: bool,
}

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

    let args = Args::parse();

    let (year, month) =
        moa_core::time::resolve_target_month(args.year, args.month, chrono::Utc::now())?;
    let window = MonthWindow::surrounding(year, month)?;
    let store_category = settings.store_category();

    if args.dry_run {
        let (reminders, suggestions) = fetch_inputs(&settings, &args, &window).await?;
        let days = moa_core::engine::aggregate(&reminders, &suggestions, store_category);
        let snapshot = OpportunitySnapshot {
            user_id: args.user_id.clone(),
            window,
            store_category,
            generated_at: chrono::Utc::now(),
            days,
        };
        tracing::info!(
            user_id = %args.user_id,
            year,
            month,
            days_len = snapshot.days.len(),
            dry_run = true,
            "aggregation run (dry-run)"
        );
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let db_url = settings.require_database_url()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    moa_core::storage::migrate(&pool).await?;

    let acquired =
        moa_core::storage::lock::try_acquire_window_lock(&pool, &args.user_id, &window).await?;
    if !acquired {
        tracing::warn!(user_id = %args.user_id, year, month, "window lock not acquired; another run in progress");
        return Ok(());
    }

    let provider = if args.stub { "stub" } else { "calendar_http_json" };
    let fetch_result = fetch_inputs(&settings, &args, &window).await;

    match fetch_result {
        Ok((reminders, suggestions)) => {
            let days = moa_core::engine::aggregate(&reminders, &suggestions, store_category);
            let snapshot = OpportunitySnapshot {
                user_id: args.user_id.clone(),
                window,
                store_category,
                generated_at: chrono::Utc::now(),
                days,
            };
            let snapshot_id =
                moa_core::storage::timelines::persist_success(&pool, &snapshot, provider).await?;

            tracing::info!(user_id = %args.user_id, year, month, %snapshot_id, "persisted opportunity snapshot");
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            let snapshot_id = moa_core::storage::timelines::persist_failure(
                &pool,
                &args.user_id,
                &window,
                store_category,
                chrono::Utc::now(),
                provider,
                &format!("{:#}", err),
            )
            .await?;

            tracing::error!(user_id = %args.user_id, year, month, %snapshot_id, error = %err, "aggregation run failed");
        }
    }

    let _ = moa_core::storage::lock::release_window_lock(&pool, &args.user_id, &window).await;
    Ok(())
}

async fn fetch_inputs(
    settings: &moa_core::config::Settings,
    args: &Args,
    window: &MonthWindow,
) -> anyhow::Result<(Vec<Reminder>, Vec<DaySuggestion>)> {
    if args.stub {
        return Ok(stub::build_stub_inputs(window, stub::StubOptions::from_env()));
    }

    let client = HttpCalendarClient::from_settings(settings)?;
    let (reminders, suggestions) = tokio::try_join!(
        client.fetch_reminders(&args.user_id, window.year, window.month),
        client.fetch_day_suggestions(&args.user_id, window.year, window.month),
    )?;
    Ok((reminders, suggestions))
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

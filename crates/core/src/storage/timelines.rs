use crate::domain::opportunity::{
    DailyOpportunities, DataSource, MarketingOpportunity, OpportunityCategory, OpportunitySnapshot,
    Priority, StoreCategory,
};
use crate::time::MonthWindow;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

pub async fn persist_success(
    pool: &sqlx::PgPool,
    snapshot: &OpportunitySnapshot,
    provider: &str,
) -> anyhow::Result<uuid::Uuid> {
    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let snapshot_id: uuid::Uuid = sqlx::query_scalar(
        "INSERT INTO opportunity_snapshots \
         (user_id, year, month, window_start, window_end, store_category, generated_at, provider, status, error) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'success', NULL) \
         RETURNING id",
    )
    .bind(&snapshot.user_id)
    .bind(snapshot.window.year)
    .bind(snapshot.window.month as i32)
    .bind(snapshot.window.start)
    .bind(snapshot.window.end)
    .bind(snapshot.store_category.as_str())
    .bind(snapshot.generated_at)
    .bind(provider)
    .fetch_one(&mut *tx)
    .await
    .context("insert opportunity_snapshots failed")?;

    for day in &snapshot.days {
        for opportunity in &day.opportunities {
            insert_item(&mut tx, snapshot_id, opportunity).await?;
        }
    }

    tx.commit().await.context("commit transaction failed")?;
    Ok(snapshot_id)
}

pub async fn persist_failure(
    pool: &sqlx::PgPool,
    user_id: &str,
    window: &MonthWindow,
    store_category: StoreCategory,
    generated_at: DateTime<Utc>,
    provider: &str,
    error: &str,
) -> anyhow::Result<uuid::Uuid> {
    let snapshot_id: uuid::Uuid = sqlx::query_scalar(
        "INSERT INTO opportunity_snapshots \
         (user_id, year, month, window_start, window_end, store_category, generated_at, provider, status, error) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'error', $9) \
         RETURNING id",
    )
    .bind(user_id)
    .bind(window.year)
    .bind(window.month as i32)
    .bind(window.start)
    .bind(window.end)
    .bind(store_category.as_str())
    .bind(generated_at)
    .bind(provider)
    .bind(error)
    .fetch_one(pool)
    .await
    .context("insert error opportunity_snapshots failed")?;

    Ok(snapshot_id)
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    snapshot_id: uuid::Uuid,
    opportunity: &MarketingOpportunity,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO opportunity_items \
         (snapshot_id, opportunity_id, date, title, description, target_customer, \
          suggested_action, expected_effect, category, confidence, priority, data_source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(snapshot_id)
    .bind(&opportunity.id)
    .bind(opportunity.date)
    .bind(&opportunity.title)
    .bind(&opportunity.description)
    .bind(&opportunity.target_customer)
    .bind(&opportunity.suggested_action)
    .bind(&opportunity.expected_effect)
    .bind(opportunity.category.as_str())
    .bind(opportunity.confidence)
    .bind(opportunity.priority.as_str())
    .bind(opportunity.data_source.as_str())
    .execute(&mut **tx)
    .await
    .context("insert opportunity_items failed")?;

    Ok(())
}

/// Latest successful snapshot for a user, any month.
pub async fn load_latest(
    pool: &sqlx::PgPool,
    user_id: &str,
) -> anyhow::Result<Option<(uuid::Uuid, OpportunitySnapshot)>> {
    let header = sqlx::query_as::<_, SnapshotHeader>(
        "SELECT id, user_id, year, month, window_start, window_end, store_category, generated_at \
         FROM opportunity_snapshots \
         WHERE user_id = $1 AND status = 'success' \
         ORDER BY generated_at DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("select latest opportunity_snapshots failed")?;

    match header {
        Some(header) => {
            let id = header.id;
            Ok(Some((id, hydrate(pool, header).await?)))
        }
        None => Ok(None),
    }
}

/// Latest successful snapshot for a user and target month.
pub async fn load_for_month(
    pool: &sqlx::PgPool,
    user_id: &str,
    year: i32,
    month: u32,
) -> anyhow::Result<Option<(uuid::Uuid, OpportunitySnapshot)>> {
    let header = sqlx::query_as::<_, SnapshotHeader>(
        "SELECT id, user_id, year, month, window_start, window_end, store_category, generated_at \
         FROM opportunity_snapshots \
         WHERE user_id = $1 AND year = $2 AND month = $3 AND status = 'success' \
         ORDER BY generated_at DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .bind(year)
    .bind(month as i32)
    .fetch_optional(pool)
    .await
    .context("select monthly opportunity_snapshots failed")?;

    match header {
        Some(header) => {
            let id = header.id;
            Ok(Some((id, hydrate(pool, header).await?)))
        }
        None => Ok(None),
    }
}

#[derive(sqlx::FromRow)]
struct SnapshotHeader {
    id: uuid::Uuid,
    user_id: String,
    year: i32,
    month: i32,
    window_start: NaiveDate,
    window_end: NaiveDate,
    store_category: String,
    generated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    opportunity_id: String,
    date: NaiveDate,
    title: String,
    description: String,
    target_customer: String,
    suggested_action: String,
    expected_effect: String,
    category: String,
    confidence: f64,
    priority: String,
    data_source: String,
}

async fn hydrate(
    pool: &sqlx::PgPool,
    header: SnapshotHeader,
) -> anyhow::Result<OpportunitySnapshot> {
    let rows = sqlx::query_as::<_, ItemRow>(
        "SELECT opportunity_id, date, title, description, target_customer, \
                suggested_action, expected_effect, category, confidence, priority, data_source \
         FROM opportunity_items \
         WHERE snapshot_id = $1 \
         ORDER BY date ASC, id ASC",
    )
    .bind(header.id)
    .fetch_all(pool)
    .await
    .context("select opportunity_items failed")?;

    let mut by_date: BTreeMap<NaiveDate, Vec<MarketingOpportunity>> = BTreeMap::new();
    for row in rows {
        let opportunity = MarketingOpportunity {
            id: row.opportunity_id,
            date: row.date,
            title: row.title,
            description: row.description,
            target_customer: row.target_customer,
            suggested_action: row.suggested_action,
            expected_effect: row.expected_effect,
            category: OpportunityCategory::parse(&row.category)?,
            confidence: row.confidence,
            priority: Priority::parse(&row.priority)?,
            data_source: DataSource::parse(&row.data_source)?,
        };
        by_date.entry(opportunity.date).or_default().push(opportunity);
    }

    let days = by_date
        .into_iter()
        .map(|(date, opportunities)| DailyOpportunities {
            date,
            opportunities,
        })
        .collect();

    Ok(OpportunitySnapshot {
        user_id: header.user_id,
        window: MonthWindow {
            year: header.year,
            month: header.month as u32,
            start: header.window_start,
            end: header.window_end,
        },
        store_category: StoreCategory::parse(&header.store_category),
        generated_at: header.generated_at,
        days,
    })
}

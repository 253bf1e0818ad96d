use anyhow::Context;
use crate::time::MonthWindow;

// Advisory locks are scoped to the Postgres session. This is used as a best-effort guard against
// concurrent aggregation runs for the same user and month.
const LOCK_NAMESPACE: i64 = 0x4D41_524B_4341; // "MARKCA" as hex-ish namespace.

fn lock_key_for(user_id: &str, window: &MonthWindow) -> i64 {
    let mut hash: i64 = 0;
    for b in user_id.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(b as i64);
    }
    LOCK_NAMESPACE ^ hash ^ ((window.year as i64) << 8) ^ (window.month as i64)
}

pub async fn try_acquire_window_lock(
    pool: &sqlx::PgPool,
    user_id: &str,
    window: &MonthWindow,
) -> anyhow::Result<bool> {
    let key = lock_key_for(user_id, window);
    let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .persistent(false)
        .bind(key)
        .fetch_one(pool)
        .await
        .with_context(|| format!("failed to acquire advisory lock (key={key})"))?;
    Ok(acquired.0)
}

pub async fn release_window_lock(
    pool: &sqlx::PgPool,
    user_id: &str,
    window: &MonthWindow,
) -> anyhow::Result<()> {
    let key = lock_key_for(user_id, window);
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .persistent(false)
        .bind(key)
        .execute(pool)
        .await
        .with_context(|| format!("failed to release advisory lock (key={key})"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_keys_differ_by_user_and_month() {
        let a = MonthWindow::surrounding(2025, 8).unwrap();
        let b = MonthWindow::surrounding(2025, 9).unwrap();
        assert_ne!(lock_key_for("user-1", &a), lock_key_for("user-2", &a));
        assert_ne!(lock_key_for("user-1", &a), lock_key_for("user-1", &b));
        assert_eq!(lock_key_for("user-1", &a), lock_key_for("user-1", &a));
    }
}

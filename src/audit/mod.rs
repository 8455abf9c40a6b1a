use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::models::setting;

/// Append an audit entry. Callers ignore the result on purpose — a failed
/// audit write must not fail the admin action it records.
pub async fn log(
    pool: &SqlitePool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove entries older than the configured retention window.
pub async fn cleanup_old_entries(pool: &SqlitePool) {
    let days: i64 = setting::get_value(pool, "audit.retention_days", "90")
        .await
        .parse()
        .unwrap_or(90);
    let cutoff = (Utc::now() - Duration::days(days))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    match sqlx::query("DELETE FROM audit_log WHERE created_at < ?1")
        .bind(&cutoff)
        .execute(pool)
        .await
    {
        Ok(res) if res.rows_affected() > 0 => {
            log::info!("Audit cleanup removed {} entries older than {}", res.rows_affected(), cutoff);
        }
        Ok(_) => {}
        Err(e) => log::warn!("Audit cleanup failed: {}", e),
    }
}

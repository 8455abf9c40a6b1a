use sqlx::SqlitePool;

/// A setting for display and editing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingDisplay {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub value: String,
    pub description: String,
    pub setting_type: String, // "text", "number", "boolean"
}

/// Find all settings, ordered by sort_order.
pub async fn find_all(pool: &SqlitePool) -> Result<Vec<SettingDisplay>, sqlx::Error> {
    sqlx::query_as::<_, SettingDisplay>(
        "SELECT id, name, label, value, description, setting_type \
         FROM settings \
         ORDER BY sort_order, id",
    )
    .fetch_all(pool)
    .await
}

/// Get a single setting's value by name, returning a default if not found or empty.
pub async fn get_value(pool: &SqlitePool, name: &str, default: &str) -> String {
    let row: Result<Option<(String,)>, _> =
        sqlx::query_as("SELECT value FROM settings WHERE name = ?1")
            .bind(name)
            .fetch_optional(pool)
            .await;
    match row {
        Ok(Some((value,))) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Update a single setting's value by id.
pub async fn update_value(pool: &SqlitePool, id: i64, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE settings SET value = ?1 WHERE id = ?2")
        .bind(value)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

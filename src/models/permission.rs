use sqlx::SqlitePool;

/// All permission codes held by a user through their role.
pub async fn find_codes_by_user_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT rp.code \
         FROM role_permissions rp \
         JOIN users u ON u.role_id = rp.role_id \
         WHERE u.id = ?1 \
         ORDER BY rp.code",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

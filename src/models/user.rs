use sqlx::SqlitePool;

/// Account ids unlocked by the login-reset maintenance script. The script
/// is a fixed operational unlock for the bootstrap accounts, not a general
/// reset facility, so the targets are hardcoded.
pub const LOGIN_RESET_USER_IDS: [i64; 3] = [1, 2931, 2932];

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
    pub role_id: i64,
    pub fail_count: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
    pub role_id: i64,
}

const SELECT_USER: &str = "SELECT id, username, password, display_name, email, role_id, \
                                  fail_count, is_active \
                           FROM users";

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = ?1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &SqlitePool, new_user: &NewUser) -> Result<i64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO users (username, password, display_name, email, role_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&new_user.username)
    .bind(&new_user.password)
    .bind(&new_user.display_name)
    .bind(&new_user.email)
    .bind(new_user.role_id)
    .execute(pool)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Record a failed login attempt against the account.
pub async fn record_login_failure(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET fail_count = fail_count + 1, \
                          updated_at = strftime('%Y-%m-%dT%H:%M:%S', 'now') \
         WHERE id = ?1",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Clear the failure counter after a successful login.
pub async fn clear_login_failures(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET fail_count = 0, \
                          updated_at = strftime('%Y-%m-%dT%H:%M:%S', 'now') \
         WHERE id = ?1",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fixed maintenance unlock: reset the failure counter on the bootstrap
/// accounts and nothing else. Returns the number of rows updated.
pub async fn reset_login_failures(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE users SET fail_count = 0 WHERE id = ?1 OR id = ?2 OR id = ?3")
        .bind(LOGIN_RESET_USER_IDS[0])
        .bind(LOGIN_RESET_USER_IDS[1])
        .bind(LOGIN_RESET_USER_IDS[2])
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

//! Shared test infrastructure.
//!
//! `setup_test_pool()` gives an in-memory SQLite pool with the schema and
//! base seed (roles, permissions, settings, admin user, prototype catalog).
//! The pool is capped at one connection so every query sees the same
//! in-memory store.

#![allow(dead_code)]

use std::str::FromStr;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use campus::auth::password;
use campus::db::{self, DbPool};
use campus::models::report_template::types::SectionType;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";

pub async fn setup_test_pool() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Bad connect options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory DB");

    sqlx::raw_sql(db::MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    let admin_hash = password::hash_password(ADMIN_PASS).expect("Failed to hash password");
    db::seed(&pool, &admin_hash).await.expect("Failed to seed");

    pool
}

/// Insert a user with a fixed id, as the maintenance-script tests need
/// specific identities to exist.
pub async fn insert_user_with_id(pool: &DbPool, id: i64, username: &str, fail_count: i64) {
    let hash = password::hash_password("irrelevant").expect("Failed to hash password");
    sqlx::query(
        "INSERT INTO users (id, username, password, display_name, role_id, fail_count) \
         VALUES (?1, ?2, ?3, ?2, (SELECT id FROM roles WHERE name = 'teacher'), ?4)",
    )
    .bind(id)
    .bind(username)
    .bind(hash)
    .bind(fail_count)
    .execute(pool)
    .await
    .expect("Failed to insert user");
}

pub async fn set_fail_count(pool: &DbPool, user_id: i64, fail_count: i64) {
    sqlx::query("UPDATE users SET fail_count = ?1 WHERE id = ?2")
        .bind(fail_count)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to set fail count");
}

pub async fn get_fail_count(pool: &DbPool, user_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT fail_count FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read fail count");
    count
}

pub async fn set_setting(pool: &DbPool, name: &str, value: &str) {
    sqlx::query("UPDATE settings SET value = ?1 WHERE name = ?2")
        .bind(value)
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to set setting");
}

/// Create a template with `names.len()` sections in the given partition,
/// appended in order.
pub async fn add_sections(
    pool: &DbPool,
    template_id: i64,
    section_type: SectionType,
    names: &[&str],
) {
    use campus::models::report_template::sections;
    for name in names {
        sections::create_section(pool, template_id, section_type, name)
            .await
            .expect("Failed to create section");
    }
}

// ---------------------------------------------------------------------------
// HTTP flow helpers
// ---------------------------------------------------------------------------

/// Cookie-session middleware with a fixed key, mirroring the server setup.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
        .cookie_secure(false)
        .cookie_http_only(true)
        .build()
}

/// Collect response cookies into a single Cookie header value.
pub fn extract_cookies<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pull the CSRF token out of a rendered page.
pub fn extract_csrf(body: &str) -> String {
    let re = regex::Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#)
        .expect("Bad regex");
    re.captures(body)
        .map(|c| c[1].to_string())
        .expect("No CSRF token in page")
}

pub fn body_string(bytes: actix_web::web::Bytes) -> String {
    String::from_utf8(bytes.to_vec()).expect("Response body was not UTF-8")
}

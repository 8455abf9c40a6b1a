use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

pub type DbPool = SqlitePool;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed roles, permissions, settings, the admin user, and the prototype
/// section catalog. Idempotent: skips when any role already exists.
pub async fn seed(pool: &DbPool, admin_password_hash: &str) -> Result<(), sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roles")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        log::info!("Database already seeded ({} roles), skipping seed", count);
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let admin_role_id = {
        let res = sqlx::query("INSERT INTO roles (name, label) VALUES ('admin', 'Administrator')")
            .execute(&mut *tx)
            .await?;
        res.last_insert_rowid()
    };
    sqlx::query("INSERT INTO roles (name, label) VALUES ('teacher', 'Teacher')")
        .execute(&mut *tx)
        .await?;

    for code in ["reports.manage_templates", "settings.manage"] {
        sqlx::query("INSERT INTO role_permissions (role_id, code) VALUES (?1, ?2)")
            .bind(admin_role_id)
            .bind(code)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        "INSERT INTO users (username, password, display_name, email, role_id) \
         VALUES ('admin', ?1, 'Administrator', 'admin@example.com', ?2)",
    )
    .bind(admin_password_hash)
    .bind(admin_role_id)
    .execute(&mut *tx)
    .await?;

    let settings: [(&str, &str, &str, &str, &str); 4] = [
        (
            "app.name",
            "Application Name",
            "Campus",
            "Shown in the page header and on the login screen.",
            "text",
        ),
        (
            "security.remote_cli_key",
            "Remote CLI Key",
            "",
            "Shared secret allowing maintenance scripts to be invoked over HTTP. Leave empty to disable remote invocation.",
            "text",
        ),
        (
            "security.max_login_failures",
            "Max Login Failures",
            "3",
            "Number of failed logins after which an account is locked.",
            "number",
        ),
        (
            "audit.retention_days",
            "Audit Retention (days)",
            "90",
            "Audit log entries older than this are removed at startup.",
            "number",
        ),
    ];
    for (i, (name, label, value, description, setting_type)) in settings.iter().enumerate() {
        sqlx::query(
            "INSERT INTO settings (name, label, value, description, setting_type, sort_order) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(name)
        .bind(label)
        .bind(value)
        .bind(description)
        .bind(setting_type)
        .bind(i as i64)
        .execute(&mut *tx)
        .await?;
    }

    let prototypes: [(&str, &str, &str); 6] = [
        ("School Letterhead", "header", "School crest, name and address block."),
        ("Student Details", "header", "Student name, form group and reporting period."),
        ("Grades Table", "body", "Per-subject attainment and effort grades."),
        ("Teacher Comments", "body", "Free-text comment block per subject."),
        ("Attendance Summary", "body", "Sessions present, absent and late."),
        ("Signature Footer", "footer", "Signature lines and page numbering."),
    ];
    for (name, section_type, description) in prototypes {
        sqlx::query(
            "INSERT INTO prototype_sections (name, section_type, description) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(section_type)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    log::info!("Base seed complete");
    Ok(())
}

use sqlx::SqlitePool;

use super::types::{ReportTemplate, TemplateListItem, TemplateUpdate};

const SELECT_TEMPLATE: &str =
    "SELECT id, name, context, orientation, page_size, margin_x, margin_y, \
            created_at, updated_at \
     FROM report_templates";

/// Find all templates for the list page, optionally filtered by a search
/// term matching name or context.
pub async fn find_all(
    pool: &SqlitePool,
    search: Option<&str>,
) -> Result<Vec<TemplateListItem>, sqlx::Error> {
    let base = "SELECT t.id, t.name, t.context, t.orientation, t.page_size, \
                       (SELECT COUNT(*) FROM template_sections s \
                        WHERE s.template_id = t.id) AS section_count \
                FROM report_templates t";

    match search.filter(|s| !s.is_empty()) {
        Some(q) => {
            let pattern = format!("%{}%", q);
            sqlx::query_as::<_, TemplateListItem>(&format!(
                "{base} WHERE t.name LIKE ?1 OR t.context LIKE ?1 ORDER BY t.name"
            ))
            .bind(pattern)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, TemplateListItem>(&format!("{base} ORDER BY t.name"))
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<ReportTemplate>, sqlx::Error> {
    sqlx::query_as::<_, ReportTemplate>(&format!("{SELECT_TEMPLATE} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Whether another template already uses this name.
pub async fn name_exists(
    pool: &SqlitePool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM report_templates WHERE name = ?1 AND id != ?2",
    )
    .bind(name)
    .bind(exclude_id.unwrap_or(0))
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Create a template with default page setup. Returns the new id.
pub async fn create(pool: &SqlitePool, name: &str, context: &str) -> Result<i64, sqlx::Error> {
    let res = sqlx::query("INSERT INTO report_templates (name, context) VALUES (?1, ?2)")
        .bind(name)
        .bind(context)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

/// Persist the edit form. Context is a read-only origin tag and is never
/// written from here.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    values: &TemplateUpdate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE report_templates \
         SET name = ?1, orientation = ?2, page_size = ?3, margin_x = ?4, margin_y = ?5, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S', 'now') \
         WHERE id = ?6",
    )
    .bind(&values.name)
    .bind(values.orientation)
    .bind(values.page_size)
    .bind(values.margin_x)
    .bind(values.margin_y)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

use sqlx::SqlitePool;

use crate::errors::AppError;
use super::types::{PrototypeSection, SectionType, TemplateSection};

/// Offset applied before renumbering so the UNIQUE(template, type, sequence)
/// constraint never sees a transient collision mid-transaction.
const SEQ_SHIFT: i64 = 100_000;

const SELECT_SECTION: &str =
    "SELECT id, template_id, section_type, name, sequence_number FROM template_sections";

/// Sections of one partition, ordered by ascending sequence number.
pub async fn find_by_type(
    pool: &SqlitePool,
    template_id: i64,
    section_type: SectionType,
) -> Result<Vec<TemplateSection>, sqlx::Error> {
    sqlx::query_as::<_, TemplateSection>(&format!(
        "{SELECT_SECTION} WHERE template_id = ?1 AND section_type = ?2 \
         ORDER BY sequence_number ASC"
    ))
    .bind(template_id)
    .bind(section_type)
    .fetch_all(pool)
    .await
}

/// A single section, scoped by its owning template.
pub async fn find_section(
    pool: &SqlitePool,
    template_id: i64,
    section_id: i64,
) -> Result<Option<TemplateSection>, sqlx::Error> {
    sqlx::query_as::<_, TemplateSection>(&format!(
        "{SELECT_SECTION} WHERE id = ?1 AND template_id = ?2"
    ))
    .bind(section_id)
    .bind(template_id)
    .fetch_optional(pool)
    .await
}

/// Append a section at the end of its partition.
pub async fn create_section(
    pool: &SqlitePool,
    template_id: i64,
    section_type: SectionType,
    name: &str,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;
    let (next,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(MAX(sequence_number), 0) + 1 \
         FROM template_sections WHERE template_id = ?1 AND section_type = ?2",
    )
    .bind(template_id)
    .bind(section_type)
    .fetch_one(&mut *tx)
    .await?;

    let res = sqlx::query(
        "INSERT INTO template_sections (template_id, section_type, name, sequence_number) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(template_id)
    .bind(section_type)
    .bind(name)
    .bind(next)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(res.last_insert_rowid())
}

/// Rename a section in place. Order and type are unaffected.
pub async fn rename_section(
    pool: &SqlitePool,
    template_id: i64,
    section_id: i64,
    name: &str,
) -> Result<(), AppError> {
    let res = sqlx::query(
        "UPDATE template_sections SET name = ?1 WHERE id = ?2 AND template_id = ?3",
    )
    .bind(name)
    .bind(section_id)
    .bind(template_id)
    .execute(pool)
    .await?;
    if res.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Delete a section and close the sequence gap it leaves behind.
pub async fn delete_section(
    pool: &SqlitePool,
    template_id: i64,
    section_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let row: Option<(SectionType,)> = sqlx::query_as(
        "SELECT section_type FROM template_sections WHERE id = ?1 AND template_id = ?2",
    )
    .bind(section_id)
    .bind(template_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some((section_type,)) = row else {
        return Err(AppError::NotFound);
    };

    sqlx::query("DELETE FROM template_sections WHERE id = ?1")
        .bind(section_id)
        .execute(&mut *tx)
        .await?;

    renumber_partition(&mut tx, template_id, section_type).await?;
    tx.commit().await?;
    Ok(())
}

/// Rewrite a partition's sequence numbers as 1..n preserving current order.
async fn renumber_partition(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    template_id: i64,
    section_type: SectionType,
) -> Result<(), sqlx::Error> {
    let ids: Vec<(i64,)> = sqlx::query_as(
        "SELECT id FROM template_sections \
         WHERE template_id = ?1 AND section_type = ?2 ORDER BY sequence_number",
    )
    .bind(template_id)
    .bind(section_type)
    .fetch_all(&mut **tx)
    .await?;

    sqlx::query(
        "UPDATE template_sections SET sequence_number = sequence_number + ?1 \
         WHERE template_id = ?2 AND section_type = ?3",
    )
    .bind(SEQ_SHIFT)
    .bind(template_id)
    .bind(section_type)
    .execute(&mut **tx)
    .await?;

    for (index, (id,)) in ids.iter().enumerate() {
        sqlx::query("UPDATE template_sections SET sequence_number = ?1 WHERE id = ?2")
            .bind(index as i64 + 1)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Persist a drag-reorder: the posted ids must be exactly the partition's
/// current members. Sequence numbers come out 1..n in the posted order.
pub async fn reorder(
    pool: &SqlitePool,
    template_id: i64,
    section_type: SectionType,
    ordered_ids: &[i64],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existing: Vec<(i64,)> = sqlx::query_as(
        "SELECT id FROM template_sections \
         WHERE template_id = ?1 AND section_type = ?2 ORDER BY sequence_number",
    )
    .bind(template_id)
    .bind(section_type)
    .fetch_all(&mut *tx)
    .await?;

    let mut current: Vec<i64> = existing.into_iter().map(|r| r.0).collect();
    let mut posted: Vec<i64> = ordered_ids.to_vec();
    current.sort_unstable();
    posted.sort_unstable();
    if current != posted {
        // Stale page or ids from another partition; nothing is written.
        return Err(AppError::NotFound);
    }

    sqlx::query(
        "UPDATE template_sections SET sequence_number = sequence_number + ?1 \
         WHERE template_id = ?2 AND section_type = ?3",
    )
    .bind(SEQ_SHIFT)
    .bind(template_id)
    .bind(section_type)
    .execute(&mut *tx)
    .await?;

    for (index, id) in ordered_ids.iter().enumerate() {
        sqlx::query("UPDATE template_sections SET sequence_number = ?1 WHERE id = ?2")
            .bind(index as i64 + 1)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// The read-only prototype catalog, grouped by type then name.
pub async fn find_prototypes(pool: &SqlitePool) -> Result<Vec<PrototypeSection>, sqlx::Error> {
    sqlx::query_as::<_, PrototypeSection>(
        "SELECT id, name, section_type, description FROM prototype_sections \
         ORDER BY CASE section_type \
                      WHEN 'header' THEN 0 WHEN 'body' THEN 1 ELSE 2 \
                  END, name",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_prototype(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<PrototypeSection>, sqlx::Error> {
    sqlx::query_as::<_, PrototypeSection>(
        "SELECT id, name, section_type, description FROM prototype_sections WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

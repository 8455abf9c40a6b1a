//! View configuration for the section tables on the template builder page.
//!
//! One shared table shape — drag handle, name column, row actions — is
//! produced per section type by `section_table()`, parameterized by the
//! type label instead of cloning a prototype table.

use crate::models::report_template::types::SectionType;

/// Drag-reorder column: where the new order is posted and the context
/// parameters that accompany it.
#[derive(Debug, Clone)]
pub struct DraggableColumn {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

/// A per-row link in the action column.
#[derive(Debug, Clone)]
pub struct RowAction {
    pub name: &'static str,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct DataTable {
    pub id: String,
    pub title: String,
    pub blank_slate: String,
    pub draggable: Option<DraggableColumn>,
}

/// Table configuration for one section-type partition of a template.
pub fn section_table(section_type: SectionType, template_id: i64) -> DataTable {
    DataTable {
        id: format!("{}Table", section_type.as_str()),
        title: section_type.title().to_string(),
        blank_slate: "There are no sections here yet.".to_string(),
        draggable: Some(DraggableColumn {
            endpoint: "/reports/templates/sections/reorder".to_string(),
            params: vec![
                ("template_id".to_string(), template_id.to_string()),
                ("section_type".to_string(), section_type.as_str().to_string()),
            ],
        }),
    }
}

/// Edit/Delete links for one section row, scoped by template and section ids.
pub fn section_row_actions(template_id: i64, section_id: i64) -> Vec<RowAction> {
    vec![
        RowAction {
            name: "edit",
            label: "Edit",
            url: format!(
                "/reports/templates/sections/edit?template_id={template_id}&section_id={section_id}"
            ),
        },
        RowAction {
            name: "delete",
            label: "Delete",
            url: format!(
                "/reports/templates/sections/delete?template_id={template_id}&section_id={section_id}"
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_parameterizes_by_type() {
        let header = section_table(SectionType::Header, 7);
        let footer = section_table(SectionType::Footer, 7);
        assert_eq!(header.id, "headerTable");
        assert_eq!(header.title, "Header");
        assert_eq!(footer.id, "footerTable");
        assert_eq!(footer.title, "Footer");
        assert_eq!(header.blank_slate, footer.blank_slate);
    }

    #[test]
    fn draggable_column_carries_partition_context() {
        let table = section_table(SectionType::Body, 42);
        let drag = table.draggable.expect("section tables are draggable");
        assert_eq!(drag.endpoint, "/reports/templates/sections/reorder");
        assert!(drag.params.contains(&("template_id".to_string(), "42".to_string())));
        assert!(drag.params.contains(&("section_type".to_string(), "body".to_string())));
    }

    #[test]
    fn row_actions_scope_both_identifiers() {
        let actions = section_row_actions(7, 31);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].name, "edit");
        assert!(actions[0].url.contains("template_id=7"));
        assert!(actions[0].url.contains("section_id=31"));
        assert_eq!(actions[1].name, "delete");
    }
}

use askama::Template;

use crate::forms::Form;
use crate::models::report_template::types::{
    PrototypeSection, ReportTemplate, TemplateListItem, TemplateSection,
};
use crate::tables::{DataTable, RowAction};

use super::PageContext;

/// One rendered section table: the per-type configuration plus its rows in
/// sequence order, with the action links resolved per row.
pub struct SectionTableView {
    pub table: DataTable,
    pub rows: Vec<(TemplateSection, Vec<RowAction>)>,
    pub add_url: String,
}

#[derive(Template)]
#[template(path = "reports/templates_list.html")]
pub struct TemplateListTemplate {
    pub ctx: PageContext,
    pub templates: Vec<TemplateListItem>,
    pub search: String,
}

#[derive(Template)]
#[template(path = "reports/template_builder.html")]
pub struct TemplateBuilderTemplate {
    pub ctx: PageContext,
    pub template: ReportTemplate,
    pub search: String,
    pub form: Form,
    pub section_views: Vec<SectionTableView>,
    pub prototypes: Vec<PrototypeSection>,
    pub errors: Vec<String>,
}

/// Generic page wrapping a single declarative form (template create,
/// section create, section rename).
#[derive(Template)]
#[template(path = "form_page.html")]
pub struct FormPageTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub back_url: String,
    pub form: Form,
    pub errors: Vec<String>,
}

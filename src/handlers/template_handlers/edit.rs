use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::audit;
use crate::auth::csrf;
use crate::auth::session::{get_user_id, require_permission};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::forms::{Field, Form};
use crate::handlers::return_message;
use crate::models::report_template::types::{
    Orientation, PageSize, ReportTemplate, SectionType, TemplateUpdate,
};
use crate::models::report_template::{queries, sections};
use crate::tables::{section_row_actions, section_table};
use crate::templates_structs::{PageContext, SectionTableView, TemplateBuilderTemplate};

#[derive(Deserialize)]
pub struct EditPageQuery {
    pub template_id: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "return")]
    pub return_code: Option<String>,
}

/// GET /reports/templates/edit
///
/// The template builder page: the bound page-setup form, one reorderable
/// table per section type, and the prototype catalog.
pub async fn edit_form(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<EditPageQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;

    let template_id = match query.template_id.as_deref().filter(|s| !s.is_empty()) {
        None => return Err(AppError::MissingParameter("template_id")),
        Some(raw) => raw.parse::<i64>().map_err(|_| AppError::NotFound)?,
    };

    let template = queries::find_by_id(&pool, template_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let search = query.search.clone().unwrap_or_default();
    builder_page(
        &pool,
        &session,
        template,
        &search,
        vec![],
        query.return_code.as_deref(),
    )
    .await
}

/// Assemble and render the composite builder view. Also used to re-render
/// the page when the submitted form fails validation.
async fn builder_page(
    pool: &DbPool,
    session: &Session,
    template: ReportTemplate,
    search: &str,
    errors: Vec<String>,
    return_code: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let form = edit_template_form(&template, search);

    let mut section_views = Vec::with_capacity(SectionType::ALL.len());
    for section_type in SectionType::ALL {
        let rows = sections::find_by_type(pool, template.id, section_type).await?;
        let rows = rows
            .into_iter()
            .map(|s| {
                let actions = section_row_actions(template.id, s.id);
                (s, actions)
            })
            .collect();
        section_views.push(SectionTableView {
            table: section_table(section_type, template.id),
            rows,
            add_url: format!(
                "/reports/templates/sections/new?template_id={}&section_type={}",
                template.id,
                section_type.as_str()
            ),
        });
    }

    let prototypes = sections::find_prototypes(pool).await?;

    let mut ctx = PageContext::build(session, pool).await?;
    if ctx.flash.is_none() {
        ctx.flash = return_code.and_then(return_message).map(String::from);
    }

    let tmpl = TemplateBuilderTemplate {
        ctx,
        template,
        search: search.to_string(),
        form,
        section_views,
        prototypes,
        errors,
    };
    render(tmpl)
}

/// The page-setup edit form, bound to the loaded record.
fn edit_template_form(template: &ReportTemplate, search: &str) -> Form {
    Form::new("templatesManage", "/reports/templates/edit")
        .hidden("template_id", template.id.to_string())
        .hidden("search", search)
        .heading("Basic Information")
        .field(
            Field::text("name", "Name")
                .max_length(90)
                .required()
                .description("Must be unique")
                .value(&template.name),
        )
        .field(Field::text("context", "Context").readonly().value(&template.context))
        .heading("Document Setup")
        .field(
            Field::select("orientation", "Orientation", &Orientation::OPTIONS)
                .required()
                .value(template.orientation.as_str()),
        )
        .field(
            Field::select("page_size", "Page Size", &PageSize::OPTIONS)
                .required()
                .value(template.page_size.as_str()),
        )
        .field(
            Field::number("margin_x", "Margin X", 2)
                .required()
                .value(format!("{:.2}", template.margin_x)),
        )
        .field(
            Field::number("margin_y", "Margin Y", 2)
                .required()
                .value(format!("{:.2}", template.margin_y)),
        )
        .submit("Submit")
}

#[derive(Deserialize)]
pub struct TemplateEditForm {
    pub csrf_token: String,
    pub template_id: i64,
    pub search: Option<String>,
    pub name: String,
    pub orientation: Orientation,
    pub page_size: PageSize,
    pub margin_x: f64,
    pub margin_y: f64,
}

/// POST /reports/templates/edit
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<TemplateEditForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let template = queries::find_by_id(&pool, form.template_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let search = form.search.clone().unwrap_or_default();

    let name = form.name.trim();
    let mut errors = vec![];
    if name.is_empty() {
        errors.push("Name is required".to_string());
    } else if queries::name_exists(&pool, name, Some(template.id)).await? {
        errors.push("A template with this name already exists".to_string());
    }
    if form.margin_x < 0.0 || form.margin_y < 0.0 {
        errors.push("Margins cannot be negative".to_string());
    }

    if !errors.is_empty() {
        // Nothing is persisted; re-render the builder with the stored record.
        return builder_page(&pool, &session, template, &search, errors, None).await;
    }

    let values = TemplateUpdate {
        name: name.to_string(),
        orientation: form.orientation,
        page_size: form.page_size,
        margin_x: form.margin_x,
        margin_y: form.margin_y,
    };
    queries::update(&pool, template.id, &values).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "template_id": template.id,
        "name": values.name,
        "summary": format!("Updated report template '{}'", values.name)
    });
    let _ = audit::log(&pool, user_id, "template.updated", "report_template", template.id, details)
        .await;

    let _ = session.insert("flash", "Template updated successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header((
            "Location",
            format!(
                "/reports/templates/edit?template_id={}&search={}",
                template.id, search
            ),
        ))
        .finish())
}

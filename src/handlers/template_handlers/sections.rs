use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::audit;
use crate::auth::csrf;
use crate::auth::session::{get_user_id, require_permission};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::forms::{Field, Form};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{get_field, parse_form_body};
use crate::models::report_template::types::SectionType;
use crate::models::report_template::{queries, sections};
use crate::templates_structs::{FormPageTemplate, PageContext};

fn edit_page_url(template_id: i64) -> String {
    format!("/reports/templates/edit?template_id={template_id}")
}

#[derive(Deserialize)]
pub struct NewSectionQuery {
    pub template_id: Option<String>,
    pub section_type: Option<SectionType>,
    pub prototype_id: Option<i64>,
}

fn require_template_id(raw: &Option<String>) -> Result<i64, AppError> {
    match raw.as_deref().filter(|s| !s.is_empty()) {
        None => Err(AppError::MissingParameter("template_id")),
        Some(raw) => raw.parse::<i64>().map_err(|_| AppError::NotFound),
    }
}

fn new_section_form(
    template_id: i64,
    name: &str,
    section_type: Option<SectionType>,
) -> Form {
    let type_value = section_type.map(|t| t.as_str()).unwrap_or("body");
    Form::new("sectionAdd", "/reports/templates/sections/new")
        .hidden("template_id", template_id.to_string())
        .field(
            Field::text("name", "Name")
                .max_length(90)
                .required()
                .value(name),
        )
        .field(
            Field::select("section_type", "Type", &SectionType::OPTIONS)
                .required()
                .value(type_value),
        )
        .submit("Submit")
}

/// GET /reports/templates/sections/new
///
/// Blank section form, optionally pre-filled from a prototype or pinned to
/// the partition whose table the link came from.
pub async fn new_form(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<NewSectionQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;

    let template_id = require_template_id(&query.template_id)?;
    queries::find_by_id(&pool, template_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let (name, section_type) = match query.prototype_id {
        Some(prototype_id) => {
            let prototype = sections::find_prototype(&pool, prototype_id)
                .await?
                .ok_or(AppError::NotFound)?;
            (prototype.name, Some(prototype.section_type))
        }
        None => (String::new(), query.section_type),
    };

    let ctx = PageContext::build(&session, &pool).await?;
    let tmpl = FormPageTemplate {
        ctx,
        title: "Add Section".to_string(),
        back_url: edit_page_url(template_id),
        form: new_section_form(template_id, &name, section_type),
        errors: vec![],
    };
    render(tmpl)
}

#[derive(Deserialize)]
pub struct NewSectionForm {
    pub csrf_token: String,
    pub template_id: i64,
    pub name: String,
    pub section_type: SectionType,
}

/// POST /reports/templates/sections/new
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<NewSectionForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    queries::find_by_id(&pool, form.template_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = form.name.trim();
    if name.is_empty() {
        let ctx = PageContext::build(&session, &pool).await?;
        let tmpl = FormPageTemplate {
            ctx,
            title: "Add Section".to_string(),
            back_url: edit_page_url(form.template_id),
            form: new_section_form(form.template_id, name, Some(form.section_type)),
            errors: vec!["Name is required".to_string()],
        };
        return render(tmpl);
    }

    let section_id =
        sections::create_section(&pool, form.template_id, form.section_type, name).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "template_id": form.template_id,
        "section_id": section_id,
        "section_type": form.section_type,
        "summary": format!("Added {} section '{}'", form.section_type, name)
    });
    let _ = audit::log(&pool, user_id, "template.section_added", "template_section", section_id, details)
        .await;

    let _ = session.insert("flash", "Section added successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", edit_page_url(form.template_id)))
        .finish())
}

#[derive(Deserialize)]
pub struct SectionRefQuery {
    pub template_id: Option<String>,
    pub section_id: Option<String>,
}

fn require_section_ref(query: &SectionRefQuery) -> Result<(i64, i64), AppError> {
    let template_id = require_template_id(&query.template_id)?;
    let section_id = match query.section_id.as_deref().filter(|s| !s.is_empty()) {
        None => return Err(AppError::MissingParameter("section_id")),
        Some(raw) => raw.parse::<i64>().map_err(|_| AppError::NotFound)?,
    };
    Ok((template_id, section_id))
}

fn rename_section_form(template_id: i64, section_id: i64, name: &str, type_title: &str) -> Form {
    Form::new("sectionEdit", "/reports/templates/sections/edit")
        .hidden("template_id", template_id.to_string())
        .hidden("section_id", section_id.to_string())
        .field(Field::text("section_type", "Type").readonly().value(type_title))
        .field(
            Field::text("name", "Name")
                .max_length(90)
                .required()
                .value(name),
        )
        .submit("Submit")
}

/// GET /reports/templates/sections/edit
pub async fn edit_form(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<SectionRefQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;

    let (template_id, section_id) = require_section_ref(&query)?;
    let section = sections::find_section(&pool, template_id, section_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = PageContext::build(&session, &pool).await?;
    let tmpl = FormPageTemplate {
        ctx,
        title: "Edit Section".to_string(),
        back_url: edit_page_url(template_id),
        form: rename_section_form(
            template_id,
            section_id,
            &section.name,
            section.section_type.title(),
        ),
        errors: vec![],
    };
    render(tmpl)
}

#[derive(Deserialize)]
pub struct EditSectionForm {
    pub csrf_token: String,
    pub template_id: i64,
    pub section_id: i64,
    pub name: String,
}

/// POST /reports/templates/sections/edit
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<EditSectionForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let section = sections::find_section(&pool, form.template_id, form.section_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = form.name.trim();
    if name.is_empty() {
        let ctx = PageContext::build(&session, &pool).await?;
        let tmpl = FormPageTemplate {
            ctx,
            title: "Edit Section".to_string(),
            back_url: edit_page_url(form.template_id),
            form: rename_section_form(
                form.template_id,
                form.section_id,
                name,
                section.section_type.title(),
            ),
            errors: vec!["Name is required".to_string()],
        };
        return render(tmpl);
    }

    sections::rename_section(&pool, form.template_id, form.section_id, name).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "template_id": form.template_id,
        "section_id": form.section_id,
        "name": name,
        "summary": format!("Renamed section to '{}'", name)
    });
    let _ = audit::log(&pool, user_id, "template.section_renamed", "template_section", form.section_id, details)
        .await;

    let _ = session.insert("flash", "Section updated successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", edit_page_url(form.template_id)))
        .finish())
}

/// POST /reports/templates/sections/delete
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<SectionRefQuery>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (template_id, section_id) = require_section_ref(&query)?;
    let section = sections::find_section(&pool, template_id, section_id)
        .await?
        .ok_or(AppError::NotFound)?;

    sections::delete_section(&pool, template_id, section_id).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "template_id": template_id,
        "section_id": section_id,
        "summary": format!("Deleted section '{}'", section.name)
    });
    let _ = audit::log(&pool, user_id, "template.section_deleted", "template_section", section_id, details)
        .await;

    let _ = session.insert("flash", "Section deleted successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", edit_page_url(template_id)))
        .finish())
}

/// POST /reports/templates/sections/reorder
///
/// Drag-reorder endpoint. The body carries the partition context plus the
/// new order as repeated `order` fields; parsed by hand because repeated
/// keys must keep their order.
pub async fn reorder(
    pool: web::Data<DbPool>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;

    let params = parse_form_body(&body);
    csrf::validate_csrf(&session, get_field(&params, "csrf_token"))?;

    let template_id: i64 = get_field(&params, "template_id")
        .parse()
        .map_err(|_| AppError::MissingParameter("template_id"))?;
    let section_type: SectionType = get_field(&params, "section_type")
        .parse()
        .map_err(|_| AppError::MissingParameter("section_type"))?;
    let order: Vec<i64> = params
        .iter()
        .filter(|(k, _)| k == "order")
        .filter_map(|(_, v)| v.parse().ok())
        .collect();

    sections::reorder(&pool, template_id, section_type, &order).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "template_id": template_id,
        "section_type": section_type,
        "order": order,
        "summary": format!("Reordered {} sections", section_type)
    });
    let _ = audit::log(&pool, user_id, "template.sections_reordered", "report_template", template_id, details)
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

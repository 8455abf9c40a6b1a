use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::audit;
use crate::auth::csrf;
use crate::auth::session::{get_user_id, require_permission};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::forms::{Field, Form};
use crate::models::report_template::queries;
use crate::templates_structs::{FormPageTemplate, PageContext, TemplateListTemplate};

/// Context options offered when creating a template. The value becomes the
/// template's read-only origin tag.
const CONTEXTS: [(&str, &str); 3] = [
    ("Student", "Student"),
    ("Class", "Class"),
    ("School", "School"),
];

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// GET /reports/templates
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;

    let search = query.search.clone().unwrap_or_default();
    let templates = queries::find_all(&pool, Some(search.as_str())).await?;

    let ctx = PageContext::build(&session, &pool).await?;
    let tmpl = TemplateListTemplate { ctx, templates, search };
    render(tmpl)
}

fn new_template_form(name: &str, context: &str) -> Form {
    Form::new("templateAdd", "/reports/templates/new")
        .heading("Basic Information")
        .field(
            Field::text("name", "Name")
                .max_length(90)
                .required()
                .description("Must be unique")
                .value(name),
        )
        .field(
            Field::select("context", "Context", &CONTEXTS)
                .required()
                .description("What the report is generated for. Cannot be changed later.")
                .value(context),
        )
        .submit("Submit")
}

/// GET /reports/templates/new
pub async fn new_form(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;

    let ctx = PageContext::build(&session, &pool).await?;
    let tmpl = FormPageTemplate {
        ctx,
        title: "New Template".to_string(),
        back_url: "/reports/templates".to_string(),
        form: new_template_form("", "Student"),
        errors: vec![],
    };
    render(tmpl)
}

#[derive(Deserialize)]
pub struct NewTemplateForm {
    pub csrf_token: String,
    pub name: String,
    pub context: String,
}

/// POST /reports/templates/new
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<NewTemplateForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "reports.manage_templates")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let name = form.name.trim();
    let context = form.context.trim();
    let mut errors = vec![];

    if name.is_empty() {
        errors.push("Name is required".to_string());
    } else if queries::name_exists(&pool, name, None).await? {
        errors.push("A template with this name already exists".to_string());
    }
    if !CONTEXTS.iter().any(|(value, _)| *value == context) {
        errors.push("Context is not one of the offered values".to_string());
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool).await?;
        let tmpl = FormPageTemplate {
            ctx,
            title: "New Template".to_string(),
            back_url: "/reports/templates".to_string(),
            form: new_template_form(name, context),
            errors,
        };
        return render(tmpl);
    }

    let template_id = queries::create(&pool, name, context).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let details = serde_json::json!({
        "template_id": template_id,
        "name": name,
        "context": context,
        "summary": format!("Created report template '{}'", name)
    });
    let _ = audit::log(&pool, user_id, "template.created", "report_template", template_id, details)
        .await;

    let _ = session.insert("flash", "Template created successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header((
            "Location",
            format!("/reports/templates/edit?template_id={template_id}"),
        ))
        .finish())
}

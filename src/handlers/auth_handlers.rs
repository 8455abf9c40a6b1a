use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, password};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::{permission, setting, user};
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    // If already logged in, go straight to the template list
    if session.get::<i64>("user_id").unwrap_or(None).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/reports/templates"))
            .finish());
    }

    let app_name = setting::get_value(&pool, "app.name", "Campus").await;
    let csrf_token = csrf::get_or_create_token(&session);
    let tmpl = LoginTemplate { error: None, app_name, csrf_token };
    render(tmpl)
}

pub async fn login_submit(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let app_name = setting::get_value(&pool, "app.name", "Campus").await;
    let max_failures: i64 = setting::get_value(&pool, "security.max_login_failures", "3")
        .await
        .parse()
        .unwrap_or(3);

    let found = user::find_by_username(&pool, &form.username).await?;

    match found {
        Some(u) if u.is_active => {
            // Locked accounts stay locked until the failure counter is
            // cleared, regardless of the submitted password.
            if u.fail_count >= max_failures {
                let csrf_token = csrf::get_or_create_token(&session);
                let tmpl = LoginTemplate {
                    error: Some(
                        "Your account has been locked after too many failed logins.".to_string(),
                    ),
                    app_name,
                    csrf_token,
                };
                return render(tmpl);
            }

            match password::verify_password(&form.password, &u.password) {
                Ok(true) => {
                    user::clear_login_failures(&pool, u.id).await?;

                    let perms = permission::find_codes_by_user_id(&pool, u.id).await?;
                    let perms_csv = perms.join(",");

                    let _ = session.insert("user_id", u.id);
                    let _ = session.insert("username", &u.username);
                    let _ = session.insert("permissions", &perms_csv);
                    Ok(HttpResponse::SeeOther()
                        .insert_header(("Location", "/reports/templates"))
                        .finish())
                }
                _ => {
                    user::record_login_failure(&pool, u.id).await?;
                    let csrf_token = csrf::get_or_create_token(&session);
                    let tmpl = LoginTemplate {
                        error: Some("Invalid username or password".to_string()),
                        app_name,
                        csrf_token,
                    };
                    render(tmpl)
                }
            }
        }
        _ => {
            let csrf_token = csrf::get_or_create_token(&session);
            let tmpl = LoginTemplate {
                error: Some("Invalid username or password".to_string()),
                app_name,
                csrf_token,
            };
            render(tmpl)
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}

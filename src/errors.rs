use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::templates_structs::ErrorPageTemplate;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Template(askama::Error),
    Session(String),
    PermissionDenied(String),
    Csrf,
    MissingParameter(&'static str),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::PermissionDenied(code) => write!(f, "Permission denied: {code}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::MissingParameter(name) => write!(f, "Missing parameter: {name}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::PermissionDenied(code) => {
                log::warn!("Access denied (missing {code})");
                error_page(HttpResponse::Forbidden(), "You do not have access to this action.")
            }
            AppError::MissingParameter(name) => {
                log::warn!("Missing request parameter: {name}");
                error_page(
                    HttpResponse::BadRequest(),
                    "You have not specified one or more required parameters.",
                )
            }
            AppError::NotFound => {
                error_page(HttpResponse::NotFound(), "The specified record cannot be found.")
            }
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::Session(e) => {
                log::warn!("Session error, redirecting to login: {e}");
                HttpResponse::SeeOther()
                    .insert_header(("Location", "/login"))
                    .finish()
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

fn error_page(mut builder: actix_web::HttpResponseBuilder, message: &str) -> HttpResponse {
    let tmpl = ErrorPageTemplate { message: message.to_string() };
    match tmpl.render() {
        Ok(body) => builder.content_type("text/html; charset=utf-8").body(body),
        Err(_) => builder.body(message.to_string()),
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Db(other),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an Askama template into a 200 HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

use std::collections::HashMap;

use actix_web::{HttpResponse, web};

use crate::auth::remote_key::{self, InvocationContext};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{setting, user};

/// GET /maintenance/login-reset
///
/// HTTP face of the login-reset maintenance script. Non-interactive: the
/// caller supplies the shared secret as `remoteCLIKey` and gets the same
/// plain-text result line the CLI binary prints. An unauthorized request is
/// answered with the denial message and performs no database write.
pub async fn login_reset(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let stored_key = setting::get_value(&pool, "security.remote_cli_key", "").await;
    let ctx = InvocationContext::Remote {
        key: query.get("remoteCLIKey").map(String::as_str),
    };

    if !remote_key::authorize(&ctx, &stored_key) {
        log::warn!("Rejected remote login-reset invocation (bad or missing key)");
        return Ok(plain_text(HttpResponse::Forbidden(), remote_key::DENIED_MESSAGE));
    }

    let body = run_reset(&pool).await;
    Ok(plain_text(HttpResponse::Ok(), &body))
}

/// Perform the fixed reset and describe the outcome as a one-line string.
/// Shared by the HTTP endpoint and the `login-reset` binary.
pub async fn run_reset(pool: &DbPool) -> String {
    match user::reset_login_failures(pool).await {
        Ok(count) => format!("Success: reset login failure count on {count} account(s)."),
        Err(e) => {
            log::error!("Login reset failed: {}", e);
            "Failure: the database update could not be completed.".to_string()
        }
    }
}

fn plain_text(mut builder: actix_web::HttpResponseBuilder, body: &str) -> HttpResponse {
    builder
        .content_type("text/plain; charset=utf-8")
        .body(body.to_string())
}

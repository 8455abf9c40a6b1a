//! Settings page flow: listing, saving, and the audit trail of a save.

mod common;

use actix_web::http::header;
use actix_web::{App, test, web};

use campus::handlers::{auth_handlers, settings_handlers};
use campus::models::setting;
use common::*;

macro_rules! build_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new($pool.clone()))
                .route("/login", web::get().to(auth_handlers::login_page))
                .route("/login", web::post().to(auth_handlers::login_submit))
                .route("/settings", web::get().to(settings_handlers::list))
                .route("/settings", web::post().to(settings_handlers::save)),
        )
        .await
    };
}

macro_rules! login_admin {
    ($app:expr) => {{
        let req = test::TestRequest::get().uri("/login").to_request();
        let resp = test::call_service(&$app, req).await;
        let cookies = extract_cookies(&resp);
        let body = body_string(test::read_body(resp).await);
        let csrf = extract_csrf(&body);

        let form = format!(
            "username={ADMIN_USER}&password={ADMIN_PASS}&csrf_token={}",
            csrf
        );
        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header((header::COOKIE, cookies))
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(form)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), 303);
        (extract_cookies(&resp), csrf)
    }};
}

#[actix_rt::test]
async fn settings_page_lists_seeded_settings() {
    let pool = setup_test_pool().await;
    let app = build_app!(pool);
    let (cookies, _) = login_admin!(app);

    let req = test::TestRequest::get()
        .uri("/settings")
        .insert_header((header::COOKIE, cookies))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = body_string(test::read_body(resp).await);
    assert!(body.contains("Application Name"));
    assert!(body.contains("Remote CLI Key"));
    assert!(body.contains("Max Login Failures"));
}

#[actix_rt::test]
async fn saving_updates_values_and_writes_an_audit_entry() {
    let pool = setup_test_pool().await;
    let app = build_app!(pool);
    let (cookies, csrf) = login_admin!(app);

    let (key_id,): (i64,) =
        sqlx::query_as("SELECT id FROM settings WHERE name = 'security.remote_cli_key'")
            .fetch_one(&pool)
            .await
            .expect("setting exists");

    let form = format!("csrf_token={csrf}&setting_{key_id}=n3w-k3y");
    let req = test::TestRequest::post()
        .uri("/settings")
        .insert_header((header::COOKIE, cookies))
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);

    assert_eq!(
        setting::get_value(&pool, "security.remote_cli_key", "").await,
        "n3w-k3y"
    );

    let (audit_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM audit_log WHERE action = 'settings.update'")
            .fetch_one(&pool)
            .await
            .expect("audit query");
    assert_eq!(audit_count, 1);
}

#[actix_rt::test]
async fn settings_require_the_manage_permission() {
    let pool = setup_test_pool().await;
    let app = build_app!(pool);

    // An unauthenticated session bounces to login before any permission check.
    let req = test::TestRequest::get().uri("/settings").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}

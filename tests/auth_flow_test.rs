//! Login flow tests: per-account failure counting, the lockout threshold,
//! and the maintenance unlock bringing a locked account back.

mod common;

use actix_web::http::header;
use actix_web::{App, test, web};

use campus::handlers::auth_handlers;
use campus::models::user;
use common::*;

macro_rules! build_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new($pool.clone()))
                .route("/login", web::get().to(auth_handlers::login_page))
                .route("/login", web::post().to(auth_handlers::login_submit)),
        )
        .await
    };
}

macro_rules! login_attempt {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::get().uri("/login").to_request();
        let resp = test::call_service(&$app, req).await;
        let cookies = extract_cookies(&resp);
        let body = body_string(test::read_body(resp).await);
        let csrf = extract_csrf(&body);

        let form = format!(
            "username={}&password={}&csrf_token={}",
            $username, $password, csrf
        );
        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header((header::COOKIE, cookies))
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(form)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_rt::test]
async fn failed_logins_increment_the_account_counter() {
    let pool = setup_test_pool().await;
    let app = build_app!(pool);

    for expected in 1..=2 {
        let resp = login_attempt!(app, ADMIN_USER, "not-the-password");
        assert_eq!(resp.status(), 200);
        let body = body_string(test::read_body(resp).await);
        assert!(body.contains("Invalid username or password"));
        assert_eq!(get_fail_count(&pool, 1).await, expected);
    }
}

#[actix_rt::test]
async fn account_locks_at_the_configured_threshold() {
    let pool = setup_test_pool().await;
    let app = build_app!(pool);

    for _ in 0..3 {
        let resp = login_attempt!(app, ADMIN_USER, "not-the-password");
        assert_eq!(resp.status(), 200);
    }
    assert_eq!(get_fail_count(&pool, 1).await, 3);

    // The correct password no longer helps once the threshold is reached.
    let resp = login_attempt!(app, ADMIN_USER, ADMIN_PASS);
    assert_eq!(resp.status(), 200);
    let body = body_string(test::read_body(resp).await);
    assert!(body.contains("locked"));

    // The maintenance unlock clears the counter and the login succeeds.
    user::reset_login_failures(&pool).await.expect("reset");
    assert_eq!(get_fail_count(&pool, 1).await, 0);

    let resp = login_attempt!(app, ADMIN_USER, ADMIN_PASS);
    assert_eq!(resp.status(), 303);
}

#[actix_rt::test]
async fn successful_login_clears_the_counter() {
    let pool = setup_test_pool().await;
    set_fail_count(&pool, 1, 2).await;
    let app = build_app!(pool);

    let resp = login_attempt!(app, ADMIN_USER, ADMIN_PASS);
    assert_eq!(resp.status(), 303);
    assert_eq!(get_fail_count(&pool, 1).await, 0);
}

#[actix_rt::test]
async fn unknown_user_gets_the_generic_error() {
    let pool = setup_test_pool().await;
    let app = build_app!(pool);

    let resp = login_attempt!(app, "nobody", "whatever");
    assert_eq!(resp.status(), 200);
    let body = body_string(test::read_body(resp).await);
    assert!(body.contains("Invalid username or password"));
}

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use campus::{audit, auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Ensure data directory exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/campus.db".to_string());
    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Seed roles, settings, admin user, and the prototype catalog if empty
    let admin_hash =
        auth::password::hash_password("admin123").expect("Failed to hash default password");
    db::seed(&pool, &admin_hash)
        .await
        .expect("Failed to seed database");

    // Clean up old audit entries based on retention policy
    audit::cleanup_old_entries(&pool).await;

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    log::info!("Starting server at http://127.0.0.1:8080");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Public routes
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            // Dual-mode maintenance script, keyed via ?remoteCLIKey=
            .route(
                "/maintenance/login-reset",
                web::get().to(handlers::maintenance_handlers::login_reset),
            )
            // Root redirect
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::SeeOther()
                        .insert_header(("Location", "/reports/templates"))
                        .finish()
                }),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("/logout", web::post().to(handlers::auth_handlers::logout))
                    // Template builder — /new BEFORE /edit so nothing shadows it
                    .route(
                        "/reports/templates",
                        web::get().to(handlers::template_handlers::list::list),
                    )
                    .route(
                        "/reports/templates/new",
                        web::get().to(handlers::template_handlers::list::new_form),
                    )
                    .route(
                        "/reports/templates/new",
                        web::post().to(handlers::template_handlers::list::create),
                    )
                    .route(
                        "/reports/templates/edit",
                        web::get().to(handlers::template_handlers::edit::edit_form),
                    )
                    .route(
                        "/reports/templates/edit",
                        web::post().to(handlers::template_handlers::edit::update),
                    )
                    // Sections
                    .route(
                        "/reports/templates/sections/new",
                        web::get().to(handlers::template_handlers::sections::new_form),
                    )
                    .route(
                        "/reports/templates/sections/new",
                        web::post().to(handlers::template_handlers::sections::create),
                    )
                    .route(
                        "/reports/templates/sections/edit",
                        web::get().to(handlers::template_handlers::sections::edit_form),
                    )
                    .route(
                        "/reports/templates/sections/edit",
                        web::post().to(handlers::template_handlers::sections::update),
                    )
                    .route(
                        "/reports/templates/sections/delete",
                        web::post().to(handlers::template_handlers::sections::delete),
                    )
                    .route(
                        "/reports/templates/sections/reorder",
                        web::post().to(handlers::template_handlers::sections::reorder),
                    )
                    // Settings
                    .route("/settings", web::get().to(handlers::settings_handlers::list))
                    .route("/settings", web::post().to(handlers::settings_handlers::save)),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}

//! Maintenance script: unlock the bootstrap accounts by clearing their
//! login failure counters. Local execution is inherently trusted; the same
//! operation is reachable over HTTP through /maintenance/login-reset with
//! the shared key.

use campus::auth::remote_key::{self, InvocationContext};
use campus::db;
use campus::handlers::maintenance_handlers::run_reset;
use campus::models::setting;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/campus.db".to_string());
    let pool = match db::init_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            println!("Failure: could not open database at {database_url}: {e}");
            return;
        }
    };

    // Same gate as the HTTP surface; a local shell always passes it.
    let stored_key = setting::get_value(&pool, "security.remote_cli_key", "").await;
    if !remote_key::authorize(&InvocationContext::LocalCli, &stored_key) {
        println!("{}", remote_key::DENIED_MESSAGE);
        return;
    }

    println!("{}", run_reset(&pool).await);
}

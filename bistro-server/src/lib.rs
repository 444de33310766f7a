//! Bistro Server - restaurant ordering backend
//!
//! # Architecture overview
//!
//! - **HTTP API** (`api`): axum routes and handlers
//! - **Auth** (`auth`): JWT + Argon2 authentication, access-control policy
//! - **Database** (`db`): SQLite via sqlx, repository modules per table
//! - **Core** (`core`): configuration, server state, startup
//!
//! # Module structure
//!
//! ```text
//! bistro-server/src/
//! ├── core/          # config, state, server, errors
//! ├── auth/          # JWT auth, password hashing, policy
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # connection pool, migrations, repositories
//! └── utils/         # error envelope, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events under the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load environment and initialize logging. Call once at startup.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _      __
   / __ )(_)____/ /__________
  / __  / / ___/ __/ ___/ __ \
 / /_/ / (__  ) /_/ /  / /_/ /
/_____/_/____/\__/_/   \____/
    "#
    );
}

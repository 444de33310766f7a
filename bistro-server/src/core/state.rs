use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

/// Server state — shared handles for all services
///
/// Cloning is cheap: the pool and JWT service are reference-counted.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | pool | SqlitePool | SQLite connection pool |
/// | jwt_service | Arc<JwtService> | JWT token service |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Initialize the server state.
    ///
    /// Order of initialization:
    /// 1. Work directory structure
    /// 2. Database (work_dir/database/bistro.db) with migrations
    /// 3. JWT service
    /// 4. Admin account bootstrap (when configured)
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be initialized; the server cannot
    /// operate without it.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("bistro.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db_service.pool, jwt_service);
        state.ensure_admin_account().await;
        state
    }

    /// Get a database pool handle
    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Create the admin account on first start when `ADMIN_USERNAME` and
    /// `ADMIN_PASSWORD` are set and the user does not exist yet.
    async fn ensure_admin_account(&self) {
        let (Ok(username), Ok(password)) = (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) else {
            return;
        };

        match crate::db::repository::user::find_by_username(&self.pool, &username).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let email = std::env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost"));
                let hash = match crate::auth::password::hash_password(&password) {
                    Ok(h) => h,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to hash admin password");
                        return;
                    }
                };
                match crate::db::repository::user::create(&self.pool, &username, &email, &hash, true)
                    .await
                {
                    Ok(user) => {
                        tracing::info!(user_id = user.id, username = %username, "Admin account created");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create admin account");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to look up admin account");
            }
        }
    }
}

//! Application state shared across handlers.

use ottowrite_access::AccessTokenService;
use ottowrite_core::Config;
use ottowrite_db::{AccessLogRepository, AlertRepository, ShareRepository};
use sqlx::PgPool;

/// Everything a handler can reach. Wrapped in an `Arc` at setup; repositories
/// hold pool clones, which are cheap handles onto the same pool.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub token_service: AccessTokenService,
    pub shares: ShareRepository,
    pub access_logs: AccessLogRepository,
    pub alerts: AlertRepository,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, token_service: AccessTokenService) -> Self {
        Self {
            shares: ShareRepository::new(pool.clone()),
            access_logs: AccessLogRepository::new(pool.clone()),
            alerts: AlertRepository::new(pool.clone()),
            config,
            pool,
            token_service,
        }
    }
}

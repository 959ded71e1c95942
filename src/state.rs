use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    realtime::NotificationHub,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub hub: NotificationHub,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(pool.clone());
        let hub = NotificationHub::new(config.ws_buffer);
        Self {
            pool,
            orm,
            hub,
            config: Arc::new(config),
        }
    }
}

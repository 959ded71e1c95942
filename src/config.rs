use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Default cap for the restaurant order listing.
    pub order_list_limit: u64,
    /// Base URL of the customer ordering frontend, used for table QR links.
    pub frontend_url: String,
    /// Outbound real-time events buffered per connection before drops.
    pub ws_buffer: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3001);
        let order_list_limit = env::var("ORDER_LIST_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(50);
        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let ws_buffer = env::var("WS_BUFFER")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(64);
        Ok(Self {
            port,
            database_url,
            host,
            order_list_limit,
            frontend_url,
            ws_buffer,
        })
    }

    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            order_list_limit: 50,
            frontend_url: "http://localhost:3000".to_string(),
            ws_buffer: 64,
        }
    }
}

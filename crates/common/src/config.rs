/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram delivery
    pub telegram_token: String,
    pub telegram_chat_id: String,

    // Audit database
    pub database_url: String,

    // Watchlist config file path
    pub watchlist_path: String,

    // Per-instrument market data fetch timeout
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            telegram_token: required_env("TELEGRAM_TOKEN"),
            telegram_chat_id: required_env("TELEGRAM_CHAT_ID"),
            database_url: required_env("DATABASE_URL"),
            watchlist_path: optional_env("WATCHLIST_PATH")
                .unwrap_or_else(|| "config/watchlist.toml".to_string()),
            fetch_timeout_secs: optional_env("FETCH_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

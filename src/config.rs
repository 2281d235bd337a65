use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub service_key: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub worker_count: usize,
    pub poll_interval_secs: u64,
    pub queue_batch_size: i64,
    pub webhook_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let service_key = env_required("BIZFLOW_SERVICE_KEY")?;
        if service_key.len() < 16 {
            return Err("BIZFLOW_SERVICE_KEY must be at least 16 characters".to_string());
        }

        let host: IpAddr = env_or("BIZFLOW_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid BIZFLOW_HOST: {e}"))?;

        let port: u16 = env_or("BIZFLOW_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid BIZFLOW_PORT: {e}"))?;

        let log_level = env_or("BIZFLOW_LOG_LEVEL", "info");

        let worker_count: usize = env_or("BIZFLOW_WORKER_COUNT", "1")
            .parse()
            .map_err(|e| format!("Invalid BIZFLOW_WORKER_COUNT: {e}"))?;

        let poll_interval_secs: u64 = env_or("BIZFLOW_POLL_INTERVAL_SECS", "5")
            .parse()
            .map_err(|e| format!("Invalid BIZFLOW_POLL_INTERVAL_SECS: {e}"))?;

        let queue_batch_size: i64 = env_or("BIZFLOW_QUEUE_BATCH_SIZE", "10")
            .parse()
            .map_err(|e| format!("Invalid BIZFLOW_QUEUE_BATCH_SIZE: {e}"))?;
        if queue_batch_size < 1 {
            return Err("BIZFLOW_QUEUE_BATCH_SIZE must be positive".to_string());
        }

        let webhook_timeout_secs: u64 = env_or("BIZFLOW_WEBHOOK_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid BIZFLOW_WEBHOOK_TIMEOUT_SECS: {e}"))?;

        Ok(Config {
            database_url,
            service_key,
            host,
            port,
            log_level,
            worker_count,
            poll_interval_secs,
            queue_batch_size,
            webhook_timeout_secs,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

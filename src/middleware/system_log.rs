use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Persist an operational event to `system_logs`. Never fails the caller.
pub async fn record(
    pool: &PgPool,
    level: Level,
    source: &str,
    message: &str,
    details: Option<serde_json::Value>,
) {
    match level {
        Level::Info => tracing::info!(source, "{message}"),
        Level::Warn => tracing::warn!(source, "{message}"),
        Level::Error => tracing::error!(source, "{message}"),
    }

    if let Err(e) =
        crate::db::system_logs::create(pool, level.as_str(), source, message, details.as_ref())
            .await
    {
        tracing::error!("Failed to write system log: {e}");
    }
}

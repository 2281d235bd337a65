use sqlx::PgPool;

/// Row-change events emitted by the installed triggers, as (table, event).
pub const ROW_EVENTS: &[(&str, &str)] = &[
    ("projects", "project.changed"),
    ("project_stages", "stage.changed"),
];

const ENQUEUE_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION enqueue_row_webhook() RETURNS trigger AS $$
DECLARE
    event_name TEXT := TG_ARGV[0];
    body JSONB;
BEGIN
    body := jsonb_build_object(
        'event', event_name,
        'table', TG_TABLE_NAME,
        'operation', TG_OP,
        'record', CASE WHEN TG_OP = 'DELETE' THEN NULL ELSE to_jsonb(NEW) END,
        'old_record', CASE WHEN TG_OP = 'INSERT' THEN NULL ELSE to_jsonb(OLD) END,
        'occurred_at', now()
    );

    INSERT INTO webhook_queue (webhook_id, event_type, payload)
    SELECT id, event_name, body FROM webhooks
    WHERE is_active = true AND (cardinality(events) = 0 OR event_name = ANY(events));

    RETURN COALESCE(NEW, OLD);
END;
$$ LANGUAGE plpgsql
"#;

/// (Re)install the row-change triggers. Safe to run repeatedly.
pub async fn install(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(ENQUEUE_FUNCTION).execute(&mut *tx).await?;

    let mut installed = Vec::with_capacity(ROW_EVENTS.len());
    for (table, event) in ROW_EVENTS {
        let trigger = format!("{table}_webhook");
        sqlx::query(&format!("DROP TRIGGER IF EXISTS {trigger} ON {table}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "CREATE TRIGGER {trigger} AFTER INSERT OR UPDATE OR DELETE ON {table}
             FOR EACH ROW EXECUTE FUNCTION enqueue_row_webhook('{event}')"
        ))
        .execute(&mut *tx)
        .await?;
        installed.push(trigger);
    }

    tx.commit().await?;
    Ok(installed)
}

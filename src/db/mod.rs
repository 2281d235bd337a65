pub mod chat_rooms;
pub mod kanban_columns;
pub mod projects;
pub mod stages;
pub mod system_logs;
pub mod tasks;
pub mod triggers;
pub mod webhook_logs;
pub mod webhook_queue;
pub mod webhooks;

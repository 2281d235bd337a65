pub mod chat_room;
pub mod kanban_column;
pub mod project;
pub mod stage;
pub mod system_log;
pub mod task;
pub mod webhook;
pub mod webhook_log;
pub mod webhook_queue;

pub use chat_room::ChatRoom;
pub use kanban_column::KanbanColumn;
pub use project::{Project, ProjectStatus};
pub use stage::{ProjectStage, StageStatus};
pub use system_log::SystemLog;
pub use task::{ChecklistItem, Task, TaskStatus};
pub use webhook::Webhook;
pub use webhook_log::WebhookLog;
pub use webhook_queue::WebhookQueueItem;

use std::time::Duration;

use tokio::sync::watch;

use crate::state::SharedState;
use crate::webhooks::drain;

/// Start the webhook drain pool on a dedicated Tokio runtime with its own thread pool.
/// This runs on a separate OS thread and blocks until shutdown is signaled.
pub fn run_pool(
    state: SharedState,
    shutdown: watch::Receiver<bool>,
    worker_count: usize,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    let worker_count = worker_count.max(1);

    std::thread::Builder::new()
        .name("webhook-pool".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .worker_threads(worker_count)
                .thread_name("webhook-worker")
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::error!("Failed to build webhook worker runtime: {e}");
                    return;
                }
            };

            runtime.block_on(async {
                let mut handles = Vec::with_capacity(worker_count);

                for id in 0..worker_count {
                    handles.push(tokio::spawn(run(id, state.clone(), shutdown.clone())));
                }

                tracing::info!("Webhook worker pool started ({worker_count} workers)");

                for handle in handles {
                    let _ = handle.await;
                }

                tracing::info!("Webhook worker pool stopped");
            });
        })
}

/// A single worker loop that drains the queue until it is empty, then sleeps.
async fn run(id: usize, state: SharedState, mut shutdown: watch::Receiver<bool>) {
    tracing::debug!("Worker {id} started");
    let interval = Duration::from_secs(state.config.poll_interval_secs.max(1));

    loop {
        if *shutdown.borrow() {
            break;
        }

        match drain::process_queue(
            &state.pool,
            &state.webhook_client,
            state.config.queue_batch_size,
        )
        .await
        {
            Ok(summary) if summary.processed > 0 => continue,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Worker {id} failed to drain webhook queue: {e}");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Worker {id} stopped");
}

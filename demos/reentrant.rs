use cadenza::{SchedulerBuilder, TaskId, TaskManager};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// An interval that spawns follow-up timeouts and clears itself after five runs
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let handle = SchedulerBuilder::new().build().start()?;
    let tasks = handle.task_manager();

    let runs = Arc::new(AtomicU32::new(0));
    let own_id: Arc<OnceLock<TaskId>> = Arc::new(OnceLock::new());

    let id = {
        let tasks: TaskManager = tasks.clone();
        let runs = runs.clone();
        let own_id = own_id.clone();
        tasks.clone().set_interval(
            move || {
                let n = runs.fetch_add(1, Ordering::SeqCst) + 1;
                println!("tick {}", n);
                tasks.set_timeout(move || println!("  follow-up for tick {}", n), 50);

                if n == 5 {
                    if let Some(id) = own_id.get() {
                        println!("tick {} clears interval {}", n, id);
                        tasks.clear_interval(*id);
                    }
                }
            },
            200,
        )?
    };
    own_id.set(id).ok();

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("\nactive intervals: {}", tasks.active_intervals());

    handle.shutdown().await?;
    Ok(())
}

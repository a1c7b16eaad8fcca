use cadenza::SchedulerBuilder;
use chrono::Local;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let handle = SchedulerBuilder::new().build().start()?;
    let tasks = handle.task_manager();

    for delay in [300u64, 100, 200] {
        tasks.set_timeout(
            move || {
                let now = Local::now().format("%H:%M:%S%.3f");
                println!("[{}] ⏱️  timeout after {}ms", now, delay);
            },
            delay,
        );
    }

    let ticks = Arc::new(AtomicU32::new(0));
    let counter = ticks.clone();
    let heartbeat = tasks.set_interval(
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let now = Local::now().format("%H:%M:%S%.3f");
            println!("[{}] 🔄 heartbeat #{}", now, n);
        },
        250,
    )?;

    tokio::time::sleep(Duration::from_secs(2)).await;
    tasks.clear_interval(heartbeat);
    println!("\nheartbeat {} cleared after {} ticks", heartbeat, ticks.load(Ordering::SeqCst));

    handle.shutdown().await?;
    Ok(())
}

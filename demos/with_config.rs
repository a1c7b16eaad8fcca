use cadenza::{fallible, SchedulerBuilder};
use chrono::Local;
use std::time::Duration;

/// Reads `[scheduler]` from config/cadenza.toml; try
/// `CADENZA_SCHEDULER__INTERVAL_MODE=fixed_delay` to override it.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("cadenza_runtime=debug"))
        .init();

    let builder = SchedulerBuilder::with_toml("config/cadenza.toml")?;
    println!("Loaded config: {:?}\n", builder.config());

    let handle = builder.build().start()?;
    let tasks = handle.task_manager();

    // Blocks the loop for 200ms per run, which makes fixed_rate and fixed_delay easy to tell apart.
    let slow = tasks.set_interval(
        || {
            let now = Local::now().format("%H:%M:%S%.3f");
            println!("[{}] 🐢 slow job", now);
            std::thread::sleep(Duration::from_millis(200));
        },
        500,
    )?;

    let flaky = tasks.set_interval(
        fallible(|| -> Result<(), String> {
            if Local::now().timestamp_subsec_millis() % 2 == 0 {
                Err("upstream returned 503".to_string())
            } else {
                println!("✅ flaky job succeeded");
                Ok(())
            }
        }),
        700,
    )?;

    tokio::time::sleep(Duration::from_secs(4)).await;
    tasks.clear_interval(slow);
    tasks.clear_interval(flaky);

    handle.shutdown().await?;
    Ok(())
}

mod builder;
mod handle;
mod scheduler;

pub use builder::SchedulerBuilder;
pub use handle::SchedulerHandle;
pub use scheduler::Scheduler;

mod id;
mod mode;
mod scheduled;

pub use id::TaskId;
pub use mode::IntervalMode;
pub use scheduled::ScheduledTask;

use serde::Deserialize;

/// How the next occurrence of an interval is placed on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMode {
    /// Next run is due one period after the previous due time.
    /// A run that is already overdue is scheduled immediately, without catch-up bursts.
    #[default]
    FixedRate,
    /// Next run is due one period after the previous run completed
    FixedDelay,
}

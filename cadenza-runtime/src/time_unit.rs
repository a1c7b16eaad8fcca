use crate::error::SchedulerError;
use std::time::Duration;

/// Time unit used when reading delays and periods from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Convert `value` expressed in this unit to milliseconds, saturating on overflow
    pub fn to_millis(&self, value: u64) -> u64 {
        match self {
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value.saturating_mul(1000),
            TimeUnit::Minutes => value.saturating_mul(60_000),
            TimeUnit::Hours => value.saturating_mul(3_600_000),
            TimeUnit::Days => value.saturating_mul(86_400_000),
        }
    }

    pub fn to_duration(&self, value: u64) -> Duration {
        Duration::from_millis(self.to_millis(value))
    }

    /// Parse a duration string like "5s", "10m", "2h", "500ms"
    /// Returns (value, TimeUnit) if successful
    ///
    /// Only lowercase suffixes are accepted and no whitespace is allowed
    /// between the number and the suffix.
    pub fn parse_duration(s: &str) -> Option<(u64, TimeUnit)> {
        let s = s.trim();

        let split_pos = s.find(|c: char| !c.is_ascii_digit())?;
        if split_pos == 0 {
            return None;
        }

        let (num_str, unit_str) = s.split_at(split_pos);
        let value = num_str.parse::<u64>().ok()?;

        let time_unit = match unit_str {
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            _ => return None,
        };

        Some((value, time_unit))
    }

    /// Resolve a config value to a `Duration`.
    ///
    /// Accepts shorthand ("250ms", "5s") or a bare integer, which is read as milliseconds.
    pub fn resolve(value: &str) -> Result<Duration, SchedulerError> {
        if let Some((amount, unit)) = Self::parse_duration(value) {
            return Ok(unit.to_duration(amount));
        }

        value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| SchedulerError::InvalidDuration(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shorthand_suffixes() {
        assert_eq!(TimeUnit::parse_duration("500ms"), Some((500, TimeUnit::Milliseconds)));
        assert_eq!(TimeUnit::parse_duration("5s"), Some((5, TimeUnit::Seconds)));
        assert_eq!(TimeUnit::parse_duration(" 10m "), Some((10, TimeUnit::Minutes)));
        assert_eq!(TimeUnit::parse_duration("2h"), Some((2, TimeUnit::Hours)));
        assert_eq!(TimeUnit::parse_duration("1d"), Some((1, TimeUnit::Days)));
    }

    #[test]
    fn rejects_malformed_shorthand() {
        assert_eq!(TimeUnit::parse_duration("100"), None);
        assert_eq!(TimeUnit::parse_duration("s"), None);
        assert_eq!(TimeUnit::parse_duration("5S"), None);
        assert_eq!(TimeUnit::parse_duration("5 s"), None);
        assert_eq!(TimeUnit::parse_duration("5sec"), None);
    }

    #[test]
    fn resolve_treats_bare_numbers_as_millis() {
        assert_eq!(TimeUnit::resolve("100").unwrap(), Duration::from_millis(100));
        assert_eq!(TimeUnit::resolve("2s").unwrap(), Duration::from_secs(2));
        assert!(matches!(
            TimeUnit::resolve("soon"),
            Err(SchedulerError::InvalidDuration(v)) if v == "soon"
        ));
    }

    #[test]
    fn conversion_saturates() {
        assert_eq!(TimeUnit::Days.to_millis(u64::MAX), u64::MAX);
    }
}

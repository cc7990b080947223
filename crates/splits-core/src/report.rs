//! Aggregation and rendering of recorded timers
//!
//! Each key is folded into a [`TimerSummary`] (interval count and total
//! milliseconds) which renders as either `"<total>ms"` or
//! `"<count> x <avg>ms = <total>ms"`, with digits grouped in threes.

use crate::interval::Interval;
use crate::registry::AddressingMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregate statistics for one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSummary {
    pub key: String,
    pub mode: AddressingMode,
    /// Intervals recorded for the key, running ones included
    pub count: usize,
    /// Intervals not yet stopped
    pub running: usize,
    /// Sum of closed deltas in whole milliseconds
    ///
    /// The exact summed duration is floored once, so two 1.6ms intervals
    /// render as `2 x 2ms = 3ms`.
    pub total_ms: u64,
    /// `round(total_ms / count)`
    pub avg_ms: u64,
}

impl TimerSummary {
    pub(crate) fn from_intervals<'a>(
        key: &str,
        mode: AddressingMode,
        intervals: impl IntoIterator<Item = &'a Interval>,
    ) -> Self {
        let mut count = 0;
        let mut running = 0;
        let mut total = Duration::ZERO;

        for interval in intervals {
            count += 1;
            match interval.delta() {
                Some(delta) => total += delta,
                None => running += 1,
            }
        }

        let total_ms = u64::try_from(total.as_millis()).unwrap_or(u64::MAX);
        Self {
            key: key.to_string(),
            mode,
            count,
            running,
            total_ms,
            avg_ms: rounded_average(total_ms, count),
        }
    }

    /// Rendered value without the key prefix
    pub fn render_value(&self) -> String {
        if self.count > 1 {
            format!(
                "{} x {}ms = {}ms",
                group_thousands(self.count as u64),
                group_thousands(self.avg_ms),
                group_thousands(self.total_ms)
            )
        } else {
            format!("{}ms", group_thousands(self.total_ms))
        }
    }

    /// Report line for this key
    pub fn render_line(&self) -> String {
        format!("*   {}: {}", self.key, self.render_value())
    }
}

/// Serializable snapshot of a registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerReport {
    pub generated_at: DateTime<Utc>,
    pub timers: Vec<TimerSummary>,
}

impl TimerReport {
    pub fn new(timers: Vec<TimerSummary>) -> Self {
        Self { generated_at: Utc::now(), timers }
    }
}

/// Render summaries as the text report
pub fn render(summaries: &[TimerSummary], header: &str, empty_message: &str) -> String {
    if summaries.is_empty() {
        return empty_message.to_string();
    }

    let lines: Vec<String> = summaries.iter().map(TimerSummary::render_line).collect();
    format!("{header}\n{}\n", lines.join("\n"))
}

/// Half-up rounding of `total / count`
fn rounded_average(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = count as u64;
    total / count + u64::from(total % count * 2 >= count)
}

/// Insert `,` between groups of three digits, counting from the right
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

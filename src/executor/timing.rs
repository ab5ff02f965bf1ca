//! Request timing measurement and formatting utilities.

use crate::models::response::RequestTiming;
use std::time::{Duration, Instant};

/// Timing checkpoints collected during request execution.
///
/// Only wall-clock instants the executor can observe are recorded: when
/// the request started, when it was fully written, when the response head
/// arrived and when the body finished. Missing checkpoints collapse into
/// the following phase.
#[derive(Debug, Clone)]
pub struct TimingCheckpoints {
    /// When the request started.
    pub request_start: Instant,

    /// When the request (head and body) was handed to the network.
    pub request_sent: Option<Instant>,

    /// When the response status line and headers were received.
    pub first_byte_received: Option<Instant>,

    /// When the response was completely received.
    pub response_complete: Option<Instant>,
}

impl TimingCheckpoints {
    /// Starts the clock.
    pub fn new() -> Self {
        Self {
            request_start: Instant::now(),
            request_sent: None,
            first_byte_received: None,
            response_complete: None,
        }
    }

    pub fn mark_request_sent(&mut self) {
        self.request_sent = Some(Instant::now());
    }

    pub fn mark_first_byte_received(&mut self) {
        self.first_byte_received = Some(Instant::now());
    }

    pub fn mark_response_complete(&mut self) {
        self.response_complete = Some(Instant::now());
    }

    /// Total time from start to completion (or to now, if not complete).
    pub fn elapsed(&self) -> Duration {
        self.response_complete
            .unwrap_or_else(Instant::now)
            .duration_since(self.request_start)
    }

    /// Converts checkpoints into phase durations.
    pub fn to_request_timing(&self) -> RequestTiming {
        let complete = self.response_complete.unwrap_or_else(Instant::now);
        let sent = self.request_sent.unwrap_or(self.request_start);
        let first_byte = self.first_byte_received.unwrap_or(complete);

        RequestTiming {
            send: sent.saturating_duration_since(self.request_start),
            first_byte: first_byte.saturating_duration_since(sent),
            download: complete.saturating_duration_since(first_byte),
        }
    }
}

impl Default for TimingCheckpoints {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a timing breakdown into a human-readable string.
///
/// # Examples
///
/// ```
/// use http_probe::executor::timing::format_timing_breakdown;
/// use http_probe::models::response::RequestTiming;
/// use std::time::Duration;
///
/// let timing = RequestTiming {
///     send: Duration::from_millis(10),
///     first_byte: Duration::from_millis(30),
///     download: Duration::from_millis(100),
/// };
///
/// let formatted = format_timing_breakdown(&timing);
/// assert_eq!(formatted, "Send: 10ms | First Byte: 30ms | Download: 100ms");
/// ```
pub fn format_timing_breakdown(timing: &RequestTiming) -> String {
    format!(
        "Send: {} | First Byte: {} | Download: {}",
        format_duration_human(&timing.send),
        format_duration_human(&timing.first_byte),
        format_duration_human(&timing.download)
    )
}

/// Formats a duration with a unit suited to its size: "15μs", "10ms", "1.234s".
pub fn format_duration_human(duration: &Duration) -> String {
    let micros = duration.as_micros();

    if micros == 0 {
        "0μs".to_string()
    } else if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Answer to "is this device entitled to access right now, and until when?"
/// `connected` comes from a live `expires_at > now` comparison, never from a
/// stored flag.
#[derive(Debug, Clone, Serialize)]
pub struct AccessStatusDto {
    pub connected: bool,
    pub plan_name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub time_remaining_minutes: i64,
    pub time_remaining_text: String,
}

impl AccessStatusDto {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            plan_name: None,
            expires_at: None,
            time_remaining_minutes: 0,
            time_remaining_text: format_remaining(Duration::zero()),
        }
    }
}

/// Whole hours/minutes, floored, for the portal countdown. Negative spans
/// clamp to zero.
pub fn format_remaining(remaining: Duration) -> String {
    let total_minutes = remaining.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_remaining(Duration::minutes(1470)), "24h 30m");
        assert_eq!(format_remaining(Duration::minutes(60)), "1h 0m");
        assert_eq!(format_remaining(Duration::minutes(45)), "45m");
    }

    #[test]
    fn clamps_elapsed_spans_to_zero() {
        assert_eq!(format_remaining(Duration::minutes(-5)), "0m");
        assert_eq!(format_remaining(Duration::zero()), "0m");
    }

    #[test]
    fn disconnected_status_is_empty() {
        let status = AccessStatusDto::disconnected();
        assert!(!status.connected);
        assert!(status.plan_name.is_none());
        assert!(status.expires_at.is_none());
        assert_eq!(status.time_remaining_minutes, 0);
    }
}

//! Discord timestamp markup

use chrono::{DateTime, Utc};

/// Display styles understood by Discord's `<t:...>` markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// "in 2 hours"
    Relative,
    ShortDate,
    LongDate,
    ShortDateTime,
    LongDateTime,
    Time,
    TimeWithSeconds,
}

impl TimestampFormat {
    pub fn style(self) -> char {
        match self {
            Self::Relative => 'R',
            Self::ShortDate => 'd',
            Self::LongDate => 'D',
            Self::ShortDateTime => 'f',
            Self::LongDateTime => 'F',
            Self::Time => 't',
            Self::TimeWithSeconds => 'T',
        }
    }
}

/// Render `date` as Discord timestamp markup, or `"never"` without a date
///
/// Sub-second precision is dropped, rounding towards the past.
pub fn discord_timestamp(date: Option<DateTime<Utc>>, format: TimestampFormat) -> String {
    match date {
        Some(date) => format!("<t:{}:{}>", date.timestamp(), format.style()),
        None => "never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_discord_timestamp() {
        let date = Utc
            .timestamp_millis_opt(1_700_000_000_999)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            discord_timestamp(Some(date), TimestampFormat::Relative),
            "<t:1700000000:R>"
        );
        assert_eq!(
            discord_timestamp(Some(date), TimestampFormat::LongDateTime),
            "<t:1700000000:F>"
        );
    }

    #[test]
    fn test_pre_epoch_rounds_down() {
        let date = Utc
            .timestamp_millis_opt(-1_500)
            .single()
            .expect("valid timestamp");
        assert_eq!(discord_timestamp(Some(date), TimestampFormat::Time), "<t:-2:t>");
    }

    #[test]
    fn test_missing_date() {
        assert_eq!(discord_timestamp(None, TimestampFormat::ShortDate), "never");
    }
}

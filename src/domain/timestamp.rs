//! Wire format for timestamps: `2024-Mar-05T14:03:22`, always in UTC.

use serde::Serializer;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month repr:short]-[day]T[hour]:[minute]:[second]");

pub fn format(value: OffsetDateTime) -> String {
    value
        .to_offset(UtcOffset::UTC)
        .format(FORMAT)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*value))
}

pub mod option {
    use serde::Serializer;
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format(*value)),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    #[test]
    fn formats_with_short_month_name() {
        assert_eq!(super::format(datetime!(2024-03-05 14:03:22 UTC)), "2024-Mar-05T14:03:22");
    }

    #[test]
    fn normalizes_to_utc() {
        assert_eq!(super::format(datetime!(2024-12-31 23:30:00 -02:00)), "2025-Jan-01T01:30:00");
    }
}

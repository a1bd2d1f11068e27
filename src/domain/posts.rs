use time::{Date, OffsetDateTime, format_description::FormatItem, macros::format_description};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT).expect("valid calendar date")
}

/// The timestamp shown for a post: publication time, falling back to creation
/// time for records published before the column was backfilled.
pub fn display_time(published_at: Option<OffsetDateTime>, created_at: OffsetDateTime) -> OffsetDateTime {
    published_at.unwrap_or(created_at)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn human_date_uses_long_month_and_unpadded_day() {
        let date = datetime!(2026-03-07 09:30 UTC).date();
        assert_eq!(format_human_date(date), "March 7, 2026");
    }

    #[test]
    fn display_time_prefers_publication_time() {
        let created = datetime!(2026-01-01 00:00 UTC);
        let published = datetime!(2026-02-02 00:00 UTC);
        assert_eq!(display_time(Some(published), created), published);
        assert_eq!(display_time(None, created), created);
    }
}

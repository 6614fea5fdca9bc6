use chrono::{DateTime, Utc};

/// Day-precision display format used by every export format.
pub fn format_day(dt: DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_day_month_year_with_dots() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).unwrap();
        assert_eq!(format_day(dt), "07.03.2024");
    }
}

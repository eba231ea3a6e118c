use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::config::ConfigError;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(instant: DateTime<Utc>) -> String {
    date_key_in(instant, &Local)
}

/// Key of the calendar day `instant` falls in, as observed from `zone`.
///
/// The instant is moved into `zone` before the date part is taken, so a
/// 23:30 local timestamp stays on its own day even when UTC has already
/// rolled over.
pub fn date_key_in<Tz: TimeZone>(instant: DateTime<Utc>, zone: &Tz) -> String {
    day_key(instant.with_timezone(zone).date_naive())
}

pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

pub fn parse_day_key(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), DAY_KEY_FORMAT)
        .map_err(|_| ConfigError::InvalidDate(raw.to_string()))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn shift_day(day: NaiveDate, delta_days: i64) -> NaiveDate {
    day.checked_add_signed(Duration::days(delta_days))
        .unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    use super::{date_key_in, day_key, parse_day_key, shift_day};

    #[test]
    fn same_local_day_yields_same_key() {
        let zone = FixedOffset::east_opt(8 * 3600).unwrap();
        let early = zone
            .with_ymd_and_hms(2024, 3, 7, 0, 5, 0)
            .unwrap()
            .with_timezone(&Utc);
        let late = zone
            .with_ymd_and_hms(2024, 3, 7, 23, 55, 0)
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(date_key_in(early, &zone), "2024-03-07");
        assert_eq!(date_key_in(late, &zone), "2024-03-07");
    }

    #[test]
    fn early_morning_east_of_utc_keeps_local_day() {
        // 06:00 in UTC+8 is still the previous day in UTC.
        let zone = FixedOffset::east_opt(8 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 6, 22, 0, 0).unwrap();
        assert_eq!(date_key_in(instant, &zone), "2024-03-07");
    }

    #[test]
    fn late_evening_west_of_utc_keeps_local_day() {
        let zone = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 8, 3, 30, 0).unwrap();
        assert_eq!(date_key_in(instant, &zone), "2024-03-07");
    }

    #[test]
    fn keys_are_zero_padded() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(day_key(day), "2024-01-02");
        assert_eq!(parse_day_key(" 2024-01-02 ").unwrap(), day);
        assert!(parse_day_key("02/01/2024").is_err());
    }

    #[test]
    fn shifting_crosses_month_and_year_boundaries() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(day_key(shift_day(day, 1)), "2025-01-01");
        assert_eq!(day_key(shift_day(day, -31)), "2024-11-30");
    }
}

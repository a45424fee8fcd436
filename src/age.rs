//! Age arithmetic on calendar dates.
//!
//! Ages are whole years between a date of birth and "today"; the caller always
//! supplies today so results are deterministic under test.
//!
use chrono::{Datelike, Local, NaiveDate};

/// Format used for stored dates of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` date of birth.
pub fn parse_dob(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DOB_FORMAT).ok()
}

/// Whole years from `dob` to `today`, one less if this year's birthday has not
/// happened yet. Negative when `dob` lies in the future.
///
/// A Feb 29 birthday is reached on Mar 1 in common years.
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Convenience over [`calculate_age`] for a stored date string.
pub fn age_from_str(dob: &str, today: NaiveDate) -> Option<i32> {
    parse_dob(dob).map(|d| calculate_age(d, today))
}

/// Today's date on the local clock.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn birthday_not_yet_reached_subtracts_one() {
        let dob = d(1990, 6, 15);
        assert_eq!(calculate_age(dob, d(2020, 6, 14)), 29);
        assert_eq!(calculate_age(dob, d(2020, 6, 15)), 30);
        assert_eq!(calculate_age(dob, d(2020, 12, 31)), 30);
        assert_eq!(calculate_age(dob, d(2020, 1, 1)), 29);
    }

    #[test]
    fn day_before_anniversary_is_one_less() {
        for dob in [d(1970, 1, 1), d(1985, 3, 1), d(1999, 12, 31), d(2004, 2, 29), d(1961, 7, 20)] {
            // leap years keep Feb 29 anniversaries real
            for year in [2008, 2016, 2024] {
                let anniversary = d(year, dob.month(), dob.day());
                let eve = anniversary.pred_opt().unwrap();
                assert_eq!(calculate_age(dob, eve) + 1, calculate_age(dob, anniversary));
            }
        }
    }

    #[test]
    fn leap_day_birth_in_common_year() {
        let dob = d(2000, 2, 29);
        assert_eq!(calculate_age(dob, d(2023, 2, 28)), 22);
        assert_eq!(calculate_age(dob, d(2023, 3, 1)), 23);
        assert_eq!(calculate_age(dob, d(2024, 2, 29)), 24);
    }

    #[test]
    fn future_dob_is_negative() {
        assert_eq!(calculate_age(d(2030, 1, 1), d(2026, 10, 17)), -4);
    }

    #[test]
    fn parse_dob_rejects_garbage() {
        assert_eq!(parse_dob("1990-06-15"), Some(d(1990, 6, 15)));
        assert_eq!(parse_dob(" 1990-06-15 "), Some(d(1990, 6, 15)));
        assert!(parse_dob("1990-02-30").is_none());
        assert!(parse_dob("15/06/1990").is_none());
        assert!(parse_dob("").is_none());
        assert_eq!(age_from_str("nope", d(2020, 1, 1)), None);
    }
}

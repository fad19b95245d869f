use chrono::{FixedOffset, NaiveDate, Utc};

/// East Africa Time, UTC+3 all year.
pub fn eat() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).expect("UTC+3 is a valid offset")
}

/// Calendar date in Kenya, which is what listing deadlines refer to.
pub fn today_in_kenya() -> NaiveDate {
    Utc::now().with_timezone(&eat()).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn late_utc_evening_is_already_tomorrow_in_nairobi() {
        let utc = Utc.with_ymd_and_hms(2025, 3, 10, 22, 30, 0).unwrap();
        let local = utc.with_timezone(&eat());
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }
}

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{AmortizationError, Result};

/// Returns true for Monday through Friday.
///
/// Only weekends are excluded; there is no holiday calendar, so a due date
/// falling on a bank holiday is left where it is.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Rolls a due date forward onto a business day.
///
/// The date is kept if it is a business day, otherwise the next day is used
/// if that one is, otherwise the day after that. With a weekend-only calendar
/// both Saturday and Sunday land on the following Monday.
pub fn roll_forward(date: NaiveDate) -> Result<NaiveDate> {
    for offset in 0..2 {
        let candidate = add_days(date, offset)?;
        if is_business_day(candidate) {
            return Ok(candidate);
        }
    }
    add_days(date, 2)
}

/// Moves `date` forward by `months` calendar months, clamping the day to the
/// end of the target month (Jan 31 + 1 month is Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        AmortizationError::DateOutOfRange(format!("{} plus {} months", date, months))
    })
}

/// Last calendar day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AmortizationError::DateOutOfRange(format!("end of month for {}", date)))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| AmortizationError::DateOutOfRange(format!("{} plus {} days", date, days)))
}

#[cfg(test)]
mod tests {
    use super::{add_months, end_of_month, is_business_day, roll_forward};
    use chrono::NaiveDate;
    use test_log::test;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_business_day() {
        assert!(is_business_day(ymd(2025, 1, 6))); // Monday
        assert!(is_business_day(ymd(2025, 1, 3))); // Friday
        assert!(!is_business_day(ymd(2025, 1, 4)));
        assert!(!is_business_day(ymd(2025, 1, 5)));
    }

    #[test]
    fn test_roll_forward() {
        // weekdays are left alone
        assert_eq!(roll_forward(ymd(2019, 2, 15)).unwrap(), ymd(2019, 2, 15));
        assert_eq!(roll_forward(ymd(2025, 1, 6)).unwrap(), ymd(2025, 1, 6));

        // Saturday needs the third step, Sunday the second
        assert_eq!(roll_forward(ymd(2025, 1, 4)).unwrap(), ymd(2025, 1, 6));
        assert_eq!(roll_forward(ymd(2025, 1, 5)).unwrap(), ymd(2025, 1, 6));
        assert_eq!(roll_forward(ymd(2019, 6, 15)).unwrap(), ymd(2019, 6, 17));
    }

    #[test]
    fn test_add_months() {
        assert_eq!(add_months(ymd(2019, 1, 15), 1).unwrap(), ymd(2019, 2, 15));
        assert_eq!(add_months(ymd(2019, 1, 15), 12).unwrap(), ymd(2020, 1, 15));
        assert_eq!(add_months(ymd(2024, 1, 31), 1).unwrap(), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2023, 1, 31), 1).unwrap(), ymd(2023, 2, 28));
        assert!(add_months(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(end_of_month(ymd(2019, 1, 15)).unwrap(), ymd(2019, 1, 31));
        assert_eq!(end_of_month(ymd(2024, 2, 10)).unwrap(), ymd(2024, 2, 29));
        assert_eq!(end_of_month(ymd(2023, 12, 5)).unwrap(), ymd(2023, 12, 31));
        assert_eq!(end_of_month(ymd(2023, 4, 30)).unwrap(), ymd(2023, 4, 30));
    }
}

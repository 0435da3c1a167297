//! Month-end calendar arithmetic.

use time::{util::days_in_year_month, Date};

/// Last calendar day of the month containing `date`.
pub fn month_end(date: Date) -> Date {
    let last_day = days_in_year_month(date.year(), date.month());
    date.replace_day(last_day).unwrap_or(date)
}

/// Month end of the calendar month after the one containing `date`.
///
/// `None` only past the end of the supported calendar.
pub fn next_month_end(date: Date) -> Option<Date> {
    month_end(date).next_day().map(month_end)
}

/// `count` consecutive month ends strictly after the month containing `last`.
pub fn future_month_ends(last: Date, count: usize) -> Option<Vec<Date>> {
    let mut dates = Vec::with_capacity(count);
    let mut cursor = last;
    for _ in 0..count {
        cursor = next_month_end(cursor)?;
        dates.push(cursor);
    }
    Some(dates)
}

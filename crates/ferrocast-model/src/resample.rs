//! Daily to monthly resampling.
//!
//! Each calendar month keeps the chronologically last observed close and is
//! labelled with the month's last calendar day (not the last trading day).
//! Months with no observations between the first and last observed month
//! repeat the previous month's close so the output has one entry per
//! consecutive calendar month.

use ferrocast_core::{MonthlyPoint, MonthlySeries, PriceSeries};
use time::Date;

use crate::calendar::{month_end, next_month_end};

/// Resample daily closes to month-end closes.
pub fn resample_monthly(series: &PriceSeries) -> MonthlySeries {
    let observations = series
        .points
        .iter()
        .map(|point| (point.ts.date(), point.close));

    MonthlySeries {
        symbol: series.symbol.clone(),
        points: last_per_month(observations),
    }
}

/// Re-apply the monthly rule to an already monthly series.
///
/// Returns an equal series for any output of [`resample_monthly`].
pub fn resample_monthly_points(series: &MonthlySeries) -> MonthlySeries {
    let observations = series
        .points
        .iter()
        .map(|point| (point.month_end, point.close));

    MonthlySeries {
        symbol: series.symbol.clone(),
        points: last_per_month(observations),
    }
}

fn last_per_month(observations: impl Iterator<Item = (Date, f64)>) -> Vec<MonthlyPoint> {
    let mut points: Vec<MonthlyPoint> = Vec::new();

    for (date, close) in observations {
        let bucket = month_end(date);
        let previous = points.last().map(|last| (last.month_end, last.close));
        match previous {
            Some((last_bucket, _)) if last_bucket == bucket => {
                if let Some(last) = points.last_mut() {
                    last.close = close;
                }
            }
            Some((last_bucket, carried)) => {
                let mut cursor = last_bucket;
                while let Some(next) = next_month_end(cursor) {
                    if next >= bucket {
                        break;
                    }
                    points.push(MonthlyPoint {
                        month_end: next,
                        close: carried,
                    });
                    cursor = next;
                }
                points.push(MonthlyPoint {
                    month_end: bucket,
                    close,
                });
            }
            None => points.push(MonthlyPoint {
                month_end: bucket,
                close,
            }),
        }
    }

    points
}

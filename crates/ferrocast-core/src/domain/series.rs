use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, UtcDateTime, ValidationError};

/// One daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(ts: UtcDateTime, close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        Ok(Self { ts, close })
    }
}

/// Daily closes for one symbol, ascending by timestamp.
///
/// Use [`PriceSeries::new`] for untrusted input; it enforces the ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        ensure_increasing(points.iter().map(|point| point.ts))?;
        Ok(Self { symbol, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent close, if any.
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|point| point.close)
    }
}

/// Last observed close of one calendar month, labelled with the month end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month_end: Date,
    pub close: f64,
}

/// Month-end series derived from a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub symbol: Symbol,
    pub points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    pub fn new(symbol: Symbol, points: Vec<MonthlyPoint>) -> Result<Self, ValidationError> {
        ensure_increasing(points.iter().map(|point| point.month_end))?;
        for point in &points {
            validate_non_negative("close", point.close)?;
        }
        Ok(Self { symbol, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    pub fn month_ends(&self) -> Vec<Date> {
        self.points.iter().map(|point| point.month_end).collect()
    }

    pub fn last_month_end(&self) -> Option<Date> {
        self.points.last().map(|point| point.month_end)
    }
}

fn ensure_increasing<T: PartialOrd>(keys: impl Iterator<Item = T>) -> Result<(), ValidationError> {
    let mut previous: Option<T> = None;
    for (index, key) in keys.enumerate() {
        if let Some(prev) = &previous {
            if key <= *prev {
                return Err(ValidationError::UnorderedSeries { index });
            }
        }
        previous = Some(key);
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

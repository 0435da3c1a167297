//! Seasonal ARIMA, SARIMA(p,d,q)(P,D,Q,s).
//!
//! The model is fitted on the differenced series
//! `w_t = (1 - B)^d (1 - B^s)^D y_t` by conditional sum of squares: the
//! recursion starts at the first differenced value with pre-sample `w` and
//! innovations taken as zero, and the mean squared residual is minimized
//! with Nelder–Mead.
//!
//! Coefficients are searched in an unconstrained space and mapped through
//! the partial-autocorrelation transform, so every candidate has a
//! stationary AR polynomial and an invertible MA polynomial.
//!
//! ## Example
//!
//! ```rust
//! use ferrocast_model::{Order, Sarima, SeasonalOrder};
//!
//! let data: Vec<f64> = (0..48).map(|t| 100.0 + t as f64 + (t % 12) as f64).collect();
//! let model = Sarima::new(Order::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12)).unwrap();
//! let fitted = model.fit(&data).unwrap();
//! assert_eq!(fitted.forecast(6).unwrap().len(), 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::optimizer::NelderMead;

/// Non-seasonal order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl Order {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

/// Seasonal order `(P, D, Q, s)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub period: usize,
}

impl SeasonalOrder {
    pub const fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }

    /// No seasonal component.
    pub const fn none() -> Self {
        Self::new(0, 0, 0, 0)
    }

    fn is_active(&self) -> bool {
        self.p > 0 || self.d > 0 || self.q > 0
    }
}

/// Fitted coefficients, in the sign convention
/// `φ(B)Φ(B^s) w_t = θ(B)Θ(B^s) e_t` with `φ(B) = 1 - φ₁B - …` and
/// `θ(B) = 1 + θ₁B + …`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarimaParams {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaParams {
    pub fn len(&self) -> usize {
        self.ar.len() + self.ma.len() + self.seasonal_ar.len() + self.seasonal_ma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unfitted model specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Sarima {
    order: Order,
    seasonal: SeasonalOrder,
}

impl Sarima {
    pub fn new(order: Order, seasonal: SeasonalOrder) -> Result<Self, ModelError> {
        if order.p > 5 || order.q > 5 {
            return Err(ModelError::InvalidOrder(format!(
                "non-seasonal AR/MA orders must be <= 5, got p={} q={}",
                order.p, order.q
            )));
        }
        if order.d > 2 {
            return Err(ModelError::InvalidOrder(format!(
                "differencing order must be <= 2, got d={}",
                order.d
            )));
        }
        if seasonal.p > 2 || seasonal.q > 2 {
            return Err(ModelError::InvalidOrder(format!(
                "seasonal AR/MA orders must be <= 2, got P={} Q={}",
                seasonal.p, seasonal.q
            )));
        }
        if seasonal.d > 1 {
            return Err(ModelError::InvalidOrder(format!(
                "seasonal differencing order must be <= 1, got D={}",
                seasonal.d
            )));
        }
        if seasonal.is_active() && seasonal.period < 2 {
            return Err(ModelError::InvalidOrder(format!(
                "seasonal period must be >= 2, got s={}",
                seasonal.period
            )));
        }

        Ok(Self { order, seasonal })
    }

    fn period(&self) -> usize {
        if self.seasonal.is_active() {
            self.seasonal.period
        } else {
            0
        }
    }

    fn differencing_span(&self) -> usize {
        self.order.d + self.seasonal.d * self.period()
    }

    fn parameter_count(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    /// Shortest series [`Sarima::fit`] accepts: the differencing span plus
    /// one differenced value per coefficient and one more.
    pub fn min_observations(&self) -> usize {
        self.differencing_span() + self.parameter_count() + 1
    }

    pub fn fit(&self, values: &[f64]) -> Result<FittedSarima, ModelError> {
        if values.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::NonFiniteData);
        }
        let required = self.min_observations();
        if values.len() < required {
            return Err(ModelError::InsufficientData {
                required,
                actual: values.len(),
            });
        }

        let diff_poly = self.difference_polynomial();
        let differenced = apply_difference(values, &diff_poly);

        let objective = |x: &[f64]| {
            let params = self.constrain(x);
            let (ar_poly, ma_poly) = self.lag_polynomials(&params);
            let residuals = css_residuals(&differenced, &ar_poly, &ma_poly);
            mean_square(&residuals)
        };

        let x0 = vec![0.0; self.parameter_count()];
        let minimum = NelderMead::default().minimize(objective, &x0);
        if !minimum.converged {
            return Err(ModelError::NonConvergence {
                iterations: minimum.iterations,
            });
        }
        if !minimum.value.is_finite() {
            return Err(ModelError::NonFiniteObjective);
        }

        let params = self.constrain(&minimum.x);
        let (ar_poly, ma_poly) = self.lag_polynomials(&params);
        let residuals = css_residuals(&differenced, &ar_poly, &ma_poly);
        let sigma2 = mean_square(&residuals);

        tracing::debug!(
            observations = values.len(),
            iterations = minimum.iterations,
            sigma2,
            "sarima fit converged"
        );

        Ok(FittedSarima {
            params,
            diff_poly,
            ar_poly,
            ma_poly,
            history: values.to_vec(),
            differenced,
            residuals,
            sigma2,
        })
    }

    fn difference_polynomial(&self) -> Vec<f64> {
        let mut poly = vec![1.0];
        for _ in 0..self.order.d {
            poly = poly_mul(&poly, &[1.0, -1.0]);
        }
        let period = self.period();
        for _ in 0..self.seasonal.d {
            let mut seasonal = vec![0.0; period + 1];
            seasonal[0] = 1.0;
            seasonal[period] = -1.0;
            poly = poly_mul(&poly, &seasonal);
        }
        poly
    }

    /// Map an unconstrained search vector onto coefficients.
    ///
    /// Layout: `[ar.., ma.., seasonal_ar.., seasonal_ma..]`.
    fn constrain(&self, x: &[f64]) -> SarimaParams {
        let (ar, rest) = x.split_at(self.order.p);
        let (ma, rest) = rest.split_at(self.order.q);
        let (seasonal_ar, seasonal_ma) = rest.split_at(self.seasonal.p);

        SarimaParams {
            ar: constrain_stationary(ar),
            ma: negate(constrain_stationary(ma)),
            seasonal_ar: constrain_stationary(seasonal_ar),
            seasonal_ma: negate(constrain_stationary(seasonal_ma)),
        }
    }

    /// Expanded `φ(B)Φ(B^s)` and `θ(B)Θ(B^s)`, both with a leading 1.
    fn lag_polynomials(&self, params: &SarimaParams) -> (Vec<f64>, Vec<f64>) {
        let period = self.period();

        let ar = lag_polynomial(&params.ar, 1, -1.0);
        let seasonal_ar = lag_polynomial(&params.seasonal_ar, period, -1.0);
        let ma = lag_polynomial(&params.ma, 1, 1.0);
        let seasonal_ma = lag_polynomial(&params.seasonal_ma, period, 1.0);

        (poly_mul(&ar, &seasonal_ar), poly_mul(&ma, &seasonal_ma))
    }
}

/// A fitted model, ready to forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSarima {
    params: SarimaParams,
    diff_poly: Vec<f64>,
    ar_poly: Vec<f64>,
    ma_poly: Vec<f64>,
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    sigma2: f64,
}

impl FittedSarima {
    pub fn coefficients(&self) -> &SarimaParams {
        &self.params
    }

    /// Innovation variance estimate (mean squared conditional residual).
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn observations(&self) -> usize {
        self.history.len()
    }

    /// One residual per differenced value.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Point forecasts for the next `steps` periods on the original scale.
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>, ModelError> {
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();

        for _ in 0..steps {
            let t = w.len();
            let mut next = 0.0;
            for (i, coeff) in self.ar_poly.iter().enumerate().skip(1) {
                if let Some(value) = t.checked_sub(i).and_then(|idx| w.get(idx)) {
                    next -= coeff * value;
                }
            }
            for (j, coeff) in self.ma_poly.iter().enumerate().skip(1) {
                if let Some(value) = t.checked_sub(j).and_then(|idx| e.get(idx)) {
                    next += coeff * value;
                }
            }
            w.push(next);
            e.push(0.0);
        }

        let mut y = self.history.clone();
        for step in 0..steps {
            let t = y.len();
            let mut next = w[self.differenced.len() + step];
            for (i, coeff) in self.diff_poly.iter().enumerate().skip(1) {
                next -= coeff * y[t - i];
            }
            y.push(next);
        }

        let forecast = y.split_off(self.history.len());
        if forecast.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::NonFiniteForecast);
        }
        Ok(forecast)
    }
}

fn apply_difference(values: &[f64], diff_poly: &[f64]) -> Vec<f64> {
    let span = diff_poly.len() - 1;
    (span..values.len())
        .map(|t| {
            diff_poly
                .iter()
                .enumerate()
                .map(|(i, coeff)| coeff * values[t - i])
                .sum()
        })
        .collect()
}

/// Residuals from `t = 0`; lags reaching before the series read as zero.
fn css_residuals(w: &[f64], ar_poly: &[f64], ma_poly: &[f64]) -> Vec<f64> {
    let mut residuals = vec![0.0; w.len()];

    for t in 0..w.len() {
        let mut value: f64 = ar_poly
            .iter()
            .take(t + 1)
            .enumerate()
            .map(|(i, coeff)| coeff * w[t - i])
            .sum();
        for (j, coeff) in ma_poly.iter().enumerate().skip(1) {
            if j <= t {
                value -= coeff * residuals[t - j];
            }
        }
        residuals[t] = value;
    }

    residuals
}

fn mean_square(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::INFINITY;
    }
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

/// `1 + sign·c₁B^lag + sign·c₂B^{2·lag} + …`
fn lag_polynomial(coefficients: &[f64], lag: usize, sign: f64) -> Vec<f64> {
    if coefficients.is_empty() {
        return vec![1.0];
    }
    let mut poly = vec![0.0; coefficients.len() * lag + 1];
    poly[0] = 1.0;
    for (k, coeff) in coefficients.iter().enumerate() {
        poly[(k + 1) * lag] = sign * coeff;
    }
    poly
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

fn negate(values: Vec<f64>) -> Vec<f64> {
    values.into_iter().map(|v| -v).collect()
}

/// Partial-autocorrelation (Monahan) transform: any real vector maps to the
/// coefficients of a stationary AR polynomial `1 - c₁B - … - c_nB^n`.
pub(crate) fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partial: Vec<f64> = unconstrained
        .iter()
        .map(|x| x / (1.0 + x * x).sqrt())
        .collect();

    let mut previous: Vec<f64> = Vec::with_capacity(partial.len());
    for (k, r) in partial.iter().enumerate() {
        let mut row = vec![0.0; k + 1];
        for i in 0..k {
            row[i] = previous[i] + r * previous[k - i - 1];
        }
        row[k] = *r;
        previous = row;
    }

    negate(previous)
}

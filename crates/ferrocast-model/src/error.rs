use thiserror::Error;

/// Failures raised while fitting or forecasting a seasonal ARIMA model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid model order: {0}")]
    InvalidOrder(String),

    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("series contains NaN or infinite values")]
    NonFiniteData,

    #[error("optimizer did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("objective is not finite at the fitted parameters")]
    NonFiniteObjective,

    #[error("forecast produced NaN or infinite values")]
    NonFiniteForecast,
}

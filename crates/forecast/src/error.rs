use thiserror::Error;

use crate::agent::Strategy;

/// Forecasting failure.
///
/// Model-fit failures stay distinct from contract violations: the first is an
/// estimation problem on real data, the second a broken invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("{strategy} model fit failed: {reason}")]
    ModelFit { strategy: Strategy, reason: String },

    #[error("forecast contract violated: {0}")]
    ContractViolation(String),

    #[error("model fitting timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

impl ForecastError {
    pub fn model_fit(strategy: Strategy, reason: impl Into<String>) -> Self {
        Self::ModelFit {
            strategy,
            reason: reason.into(),
        }
    }

    pub fn is_model_fit(&self) -> bool {
        matches!(self, Self::ModelFit { .. })
    }
}

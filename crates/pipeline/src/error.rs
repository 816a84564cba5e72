use thiserror::Error;

use stockcast_ai::ServiceError;
use stockcast_forecast::ForecastError;

/// Pipeline stage, in execution order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Classify,
    Forecast,
    Recommend,
    Assemble,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Classify => "classify",
            Stage::Forecast => "forecast",
            Stage::Recommend => "recommend",
            Stage::Assemble => "assemble",
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one material's run. No partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("classification failed: {0}")]
    Classification(#[source] ServiceError),

    #[error("forecasting failed: {0}")]
    Forecast(#[source] ForecastError),

    #[error("recommendation failed: {0}")]
    Recommendation(#[source] ServiceError),

    #[error("contract violation: {0}")]
    ContractViolation(String),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Classification(_) => Stage::Classify,
            PipelineError::Forecast(_) => Stage::Forecast,
            PipelineError::Recommendation(_) => Stage::Recommend,
            PipelineError::ContractViolation(_) => Stage::Assemble,
        }
    }

    /// Remote-service failure (including timeouts) at either port.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Classification(_) | PipelineError::Recommendation(_)
        )
    }
}

use serde::{Deserialize, Serialize};
use tracing::warn;

use stockcast_core::{Category, Forecast, SalesHistory};

use crate::agent::{ForecastAgent, ForecastMethod, ForecastOutcome, Strategy};
use crate::arima::ArimaAgent;
use crate::error::ForecastError;
use crate::moving_average::MovingAverageAgent;
use crate::seasonal::SeasonalAgent;

/// What to do when a model fails to fit a history that met its minimum length.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitFailurePolicy {
    /// Surface [`ForecastError::ModelFit`] to the caller.
    #[default]
    Abort,
    /// Use the flat mean instead, reported as [`ForecastMethod::DegradedMean`].
    DegradeToMean,
}

/// Routes a category label to a forecasting strategy.
///
/// Routing is a case-insensitive substring match:
/// - contains `"fast"` → smoothed average
/// - else contains `"slow"` → ARIMA
/// - anything else (including blank or garbled labels) → seasonal
///
/// The seasonal catch-all means an unexpected classification never blocks a
/// material; it is absorbed silently apart from a warning for blank labels.
#[derive(Debug, Clone, Default)]
pub struct StrategySelector {
    fit_failure: FitFailurePolicy,
    smoothed: MovingAverageAgent,
    arima: ArimaAgent,
    seasonal: SeasonalAgent,
}

impl StrategySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fit_failure(mut self, policy: FitFailurePolicy) -> Self {
        self.fit_failure = policy;
        self
    }

    pub fn fit_failure(&self) -> FitFailurePolicy {
        self.fit_failure
    }

    pub fn route(category: &Category) -> Strategy {
        if category.mentions("fast") {
            Strategy::SmoothedAverage
        } else if category.mentions("slow") {
            Strategy::Arima
        } else {
            Strategy::Seasonal
        }
    }

    pub fn agent(&self, strategy: Strategy) -> &dyn ForecastAgent {
        match strategy {
            Strategy::SmoothedAverage => &self.smoothed,
            Strategy::Arima => &self.arima,
            Strategy::Seasonal => &self.seasonal,
        }
    }

    /// Route `category` and forecast `history` with the chosen strategy.
    pub fn forecast(
        &self,
        category: &Category,
        history: &SalesHistory,
    ) -> Result<ForecastOutcome, ForecastError> {
        if category.is_blank() {
            warn!("blank category label; routing to seasonal strategy");
        }
        let strategy = Self::route(category);

        match self.agent(strategy).forecast(history) {
            Err(err) if err.is_model_fit() && self.fit_failure == FitFailurePolicy::DegradeToMean => {
                warn!(
                    strategy = %strategy,
                    observations = history.len(),
                    error = %err,
                    "model fit failed; degrading to mean forecast"
                );
                Ok(ForecastOutcome {
                    strategy,
                    method: ForecastMethod::DegradedMean,
                    forecast: Forecast::mean_fallback(history),
                })
            }
            other => other,
        }
    }
}

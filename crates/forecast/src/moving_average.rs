use stockcast_core::{HORIZON, SalesHistory};

use crate::agent::{ForecastAgent, ForecastMethod, Strategy};
use crate::error::ForecastError;
use crate::stats::trailing_mean;

/// Flat forecast at the trailing smoothed level (fast-moving materials).
///
/// Model:
/// - Rolling mean over the last `window` months, requiring `min_periods`.
/// - The last smoothed value is repeated for every forecast month.
#[derive(Debug, Clone)]
pub struct MovingAverageAgent {
    window: usize,
    min_periods: usize,
}

impl Default for MovingAverageAgent {
    fn default() -> Self {
        Self {
            window: 12,
            min_periods: 6,
        }
    }
}

impl MovingAverageAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastAgent for MovingAverageAgent {
    fn strategy(&self) -> Strategy {
        Strategy::SmoothedAverage
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::MovingAverage
    }

    fn min_history(&self) -> usize {
        self.min_periods
    }

    fn fit_predict(&self, history: &SalesHistory) -> Result<Vec<f64>, ForecastError> {
        let level = trailing_mean(history.values(), self.window, self.min_periods).ok_or_else(|| {
            ForecastError::model_fit(
                self.strategy(),
                format!(
                    "need at least {} observations for a smoothed level (got {})",
                    self.min_periods,
                    history.len()
                ),
            )
        })?;
        Ok(vec![level; HORIZON])
    }
}

use serde::{Deserialize, Serialize};

use stockcast_core::{Forecast, SalesHistory};

use crate::error::ForecastError;

/// Forecasting strategy family, one per demand category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Flat smoothed level (fast-moving materials).
    SmoothedAverage,
    /// ARIMA(5,1,0) (slow-moving materials).
    Arima,
    /// Additive trend + seasonality (seasonal materials and the catch-all).
    Seasonal,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmoothedAverage => "smoothed_average",
            Strategy::Arima => "arima",
            Strategy::Seasonal => "seasonal",
        }
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a forecast was actually computed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// History below the strategy's minimum: flat rounded mean.
    MeanFallback,
    MovingAverage,
    Arima,
    SeasonalDecomposition,
    /// Model fit failed on a sufficient history and policy allowed degrading
    /// to the flat mean.
    DegradedMean,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::MeanFallback => "mean_fallback",
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::Arima => "arima",
            ForecastMethod::SeasonalDecomposition => "seasonal_decomposition",
            ForecastMethod::DegradedMean => "degraded_mean",
        }
    }
}

impl core::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized forecast plus how it was produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub strategy: Strategy,
    pub method: ForecastMethod,
    pub forecast: Forecast,
}

/// A forecasting strategy.
///
/// Implementors only provide the model path; the minimum-history fallback and
/// output normalization are shared so every strategy honours the same
/// contract: exactly six non-negative whole units.
pub trait ForecastAgent: Send + Sync + 'static {
    fn strategy(&self) -> Strategy;

    /// Method reported when the model path runs.
    fn method(&self) -> ForecastMethod;

    /// Histories shorter than this use the mean fallback.
    fn min_history(&self) -> usize;

    /// Fit the model and return raw predictions for the next six months.
    ///
    /// Only called with `history.len() >= self.min_history()`.
    fn fit_predict(&self, history: &SalesHistory) -> Result<Vec<f64>, ForecastError>;

    fn forecast(&self, history: &SalesHistory) -> Result<ForecastOutcome, ForecastError> {
        if history.len() < self.min_history() {
            return Ok(ForecastOutcome {
                strategy: self.strategy(),
                method: ForecastMethod::MeanFallback,
                forecast: Forecast::mean_fallback(history),
            });
        }

        let raw = self.fit_predict(history)?;
        let forecast = Forecast::from_predictions(&raw)
            .map_err(|e| ForecastError::ContractViolation(e.to_string()))?;

        Ok(ForecastOutcome {
            strategy: self.strategy(),
            method: self.method(),
            forecast,
        })
    }
}

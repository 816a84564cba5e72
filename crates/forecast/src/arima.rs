//! ARIMA(p, 1, 0) forecasting for slow-moving materials.
//!
//! The series is differenced once and an autoregressive model of order `p`
//! (no intercept) is fitted on the differences by conditional least squares.
//! Forecast differences are generated recursively and integrated back from
//! the last observed level.
//!
//! Degenerate inputs (constant series, too little variation for `p` lags)
//! produce a singular normal matrix and fail with [`ForecastError::ModelFit`];
//! no fallback is substituted here.

use stockcast_core::{HORIZON, SalesHistory};

use crate::agent::{ForecastAgent, ForecastMethod, Strategy};
use crate::error::ForecastError;
use crate::stats::{difference, solve};

#[derive(Debug, Clone)]
pub struct ArimaAgent {
    /// Autoregressive order.
    p: usize,
    min_history: usize,
}

impl Default for ArimaAgent {
    fn default() -> Self {
        Self {
            p: 5,
            min_history: 12,
        }
    }
}

impl ArimaAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted AR coefficients on the differenced series (lag 1 first).
    pub fn fit(&self, history: &SalesHistory) -> Result<Vec<f64>, ForecastError> {
        let diffs = difference(history.values());
        let p = self.p;

        // Each row regresses diffs[t] on diffs[t-1..=t-p].
        if diffs.len() <= p {
            return Err(self.fit_error(format!(
                "need more than {} differenced observations (got {})",
                p,
                diffs.len()
            )));
        }

        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for t in p..diffs.len() {
            for i in 0..p {
                let xi = diffs[t - 1 - i];
                xty[i] += xi * diffs[t];
                for j in 0..p {
                    xtx[i][j] += xi * diffs[t - 1 - j];
                }
            }
        }

        solve(xtx, xty).ok_or_else(|| {
            self.fit_error("lagged differences are collinear (series too flat for the AR order)")
        })
    }

    fn fit_error(&self, reason: impl Into<String>) -> ForecastError {
        ForecastError::model_fit(Strategy::Arima, reason)
    }
}

impl ForecastAgent for ArimaAgent {
    fn strategy(&self) -> Strategy {
        Strategy::Arima
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::Arima
    }

    fn min_history(&self) -> usize {
        self.min_history
    }

    fn fit_predict(&self, history: &SalesHistory) -> Result<Vec<f64>, ForecastError> {
        let phi = self.fit(history)?;
        let values = history.values();
        let Some(&last) = values.last() else {
            return Err(self.fit_error("empty history"));
        };

        let mut diffs = difference(values);
        let mut level = last;
        let mut out = Vec::with_capacity(HORIZON);
        for _ in 0..HORIZON {
            let n = diffs.len();
            let next: f64 = phi
                .iter()
                .enumerate()
                .map(|(j, coeff)| coeff * diffs[n - 1 - j])
                .sum();
            diffs.push(next);
            level += next;
            out.push(level);
        }

        if out.iter().any(|v| !v.is_finite()) {
            return Err(self.fit_error("forecast diverged to a non-finite value"));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcast_core::Forecast;

    fn history(values: &[u32]) -> SalesHistory {
        values.iter().copied().collect()
    }

    #[test]
    fn eleven_months_use_mean_fallback() {
        let out = ArimaAgent::new()
            .forecast(&history(&[3, 8, 4, 10, 6, 5, 12, 7, 9, 15, 4]))
            .unwrap();
        assert_eq!(out.method, ForecastMethod::MeanFallback);
        // 83 / 11 = 7.545...
        assert_eq!(out.forecast, Forecast::flat(8));
    }

    #[test]
    fn twelve_months_fit_the_model() {
        let out = ArimaAgent::new()
            .forecast(&history(&[3, 8, 4, 10, 6, 5, 12, 7, 9, 15, 4, 11]))
            .unwrap();
        assert_eq!(out.method, ForecastMethod::Arima);
        assert_eq!(out.strategy, Strategy::Arima);
        // Fifth step extrapolates slightly below zero and is floored.
        assert_eq!(out.forecast.values(), &[14, 1, 15, 11, 0, 21]);
    }

    #[test]
    fn constant_series_is_a_model_fit_error() {
        let err = ArimaAgent::new().forecast(&history(&[0; 20])).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ModelFit {
                strategy: Strategy::Arima,
                ..
            }
        ));

        let err = ArimaAgent::new().forecast(&history(&[5; 15])).unwrap_err();
        assert!(err.is_model_fit());
    }

    #[test]
    fn coefficients_have_requested_order() {
        let phi = ArimaAgent::new()
            .fit(&history(&[12, 15, 11, 18, 14, 13, 19, 16, 15, 21, 17, 16, 22, 19, 18]))
            .unwrap();
        assert_eq!(phi.len(), 5);
        assert!(phi.iter().all(|c| c.is_finite()));
    }
}

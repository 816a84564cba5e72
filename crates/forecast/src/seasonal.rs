//! Additive trend + yearly seasonality for seasonal materials.
//!
//! Observations are laid on a synthetic month-end timeline starting at
//! [`TIMELINE_START`]; the absolute dates carry no meaning, only the monthly
//! spacing and month-of-year position do.

use chrono::{Datelike, Months, NaiveDate};

use stockcast_core::{HORIZON, SalesHistory};

use crate::agent::{ForecastAgent, ForecastMethod, Strategy};
use crate::error::ForecastError;
use crate::stats::{linear_trend, mean};

/// Year and month of the first synthetic month-end (2024-01-31).
pub const TIMELINE_START: (i32, u32) = (2024, 1);

const MONTHS_PER_YEAR: usize = 12;

/// Model:
/// - Linear trend fitted by least squares over the month index.
/// - Month-of-year offsets from the detrended series, centred on zero, once
///   at least `min_seasonal_cycles` full years are observed; zero otherwise.
/// - Predict trend + offset across the timeline extended by six months and
///   keep the last six points.
#[derive(Debug, Clone)]
pub struct SeasonalAgent {
    min_history: usize,
    min_seasonal_cycles: usize,
}

impl Default for SeasonalAgent {
    fn default() -> Self {
        Self {
            min_history: 5,
            min_seasonal_cycles: 2,
        }
    }
}

impl SeasonalAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Month-end date of the `index`-th point of the synthetic timeline.
    pub fn month_end(index: usize) -> Option<NaiveDate> {
        let (year, month) = TIMELINE_START;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let offset = u32::try_from(index).ok()?;
        first
            .checked_add_months(Months::new(offset))?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }

    fn timeline(&self, len: usize) -> Result<Vec<NaiveDate>, ForecastError> {
        (0..len)
            .map(|i| {
                Self::month_end(i).ok_or_else(|| {
                    ForecastError::model_fit(Strategy::Seasonal, "timeline out of calendar range")
                })
            })
            .collect()
    }

    fn seasonal_offsets(
        &self,
        values: &[f64],
        timeline: &[NaiveDate],
        trend: impl Fn(usize) -> f64,
    ) -> [f64; MONTHS_PER_YEAR] {
        let mut offsets = [0.0; MONTHS_PER_YEAR];
        if values.len() < self.min_seasonal_cycles * MONTHS_PER_YEAR {
            return offsets;
        }

        let mut buckets: [Vec<f64>; MONTHS_PER_YEAR] = Default::default();
        for (i, (value, date)) in values.iter().zip(timeline).enumerate() {
            buckets[date.month0() as usize].push(value - trend(i));
        }
        for (slot, bucket) in offsets.iter_mut().zip(&buckets) {
            *slot = mean(bucket);
        }

        let centre = mean(&offsets);
        for slot in &mut offsets {
            *slot -= centre;
        }
        offsets
    }
}

impl ForecastAgent for SeasonalAgent {
    fn strategy(&self) -> Strategy {
        Strategy::Seasonal
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::SeasonalDecomposition
    }

    fn min_history(&self) -> usize {
        self.min_history
    }

    fn fit_predict(&self, history: &SalesHistory) -> Result<Vec<f64>, ForecastError> {
        let values = history.values();
        let (intercept, slope) = linear_trend(values).ok_or_else(|| {
            ForecastError::model_fit(Strategy::Seasonal, "need at least two observations for a trend")
        })?;
        let trend = |i: usize| intercept + slope * i as f64;

        let timeline = self.timeline(values.len() + HORIZON)?;
        let offsets = self.seasonal_offsets(values, &timeline, trend);

        let predicted: Vec<f64> = timeline
            .iter()
            .enumerate()
            .map(|(i, date)| trend(i) + offsets[date.month0() as usize])
            .collect();

        if predicted.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::model_fit(
                Strategy::Seasonal,
                "decomposition produced a non-finite prediction",
            ));
        }
        Ok(predicted[predicted.len() - HORIZON..].to_vec())
    }
}

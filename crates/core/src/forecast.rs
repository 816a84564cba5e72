//! Fixed-horizon demand forecast.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::sales::SalesHistory;
use crate::value_object::ValueObject;

/// Number of future months in every forecast.
pub const HORIZON: usize = 6;

/// Forecast units for the next [`HORIZON`] months, in chronological order.
///
/// The fixed-size array makes the length invariant structural; values are
/// whole, non-negative units by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forecast([u64; HORIZON]);

impl Forecast {
    /// Same value for every month.
    pub fn flat(value: u64) -> Self {
        Self([value; HORIZON])
    }

    /// Flat forecast at the rounded mean of the history (0 for an empty history).
    pub fn mean_fallback(history: &SalesHistory) -> Self {
        Self::flat(to_units(history.mean()))
    }

    /// Normalize raw model output: round half to even, floor at zero.
    ///
    /// Rejects output that is not exactly [`HORIZON`] finite values.
    pub fn from_predictions(predictions: &[f64]) -> Result<Self, DomainError> {
        if predictions.len() != HORIZON {
            return Err(DomainError::invariant(format!(
                "forecast must contain exactly {HORIZON} values (got {})",
                predictions.len()
            )));
        }
        let mut units = [0u64; HORIZON];
        for (slot, value) in units.iter_mut().zip(predictions) {
            if !value.is_finite() {
                return Err(DomainError::invariant(format!(
                    "forecast value must be finite (got {value})"
                )));
            }
            *slot = to_units(*value);
        }
        Ok(Self(units))
    }

    pub fn values(&self) -> &[u64; HORIZON] {
        &self.0
    }

    pub fn is_flat(&self) -> bool {
        self.0.iter().all(|v| *v == self.0[0])
    }
}

impl ValueObject for Forecast {}

impl core::fmt::Display for Forecast {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

fn to_units(value: f64) -> u64 {
    let rounded = value.round_ties_even();
    if rounded > 0.0 { rounded as u64 } else { 0 }
}

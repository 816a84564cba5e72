//! Monthly sales history of a single material.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Chronologically ordered monthly sales observations (oldest first).
///
/// Every observation is finite and non-negative. The buffer is shared, so
/// cloning a history is cheap and never copies the observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct SalesHistory(Arc<[f64]>);

impl SalesHistory {
    pub fn new(observations: Vec<f64>) -> Result<Self, DomainError> {
        if let Some((month, value)) = observations
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            return Err(DomainError::validation(format!(
                "sales observation {month} must be a finite non-negative number (got {value})"
            )));
        }
        Ok(Self(observations.into()))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean; an empty history has mean 0.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / (self.0.len() as f64)
    }
}

impl ValueObject for SalesHistory {}

impl TryFrom<Vec<f64>> for SalesHistory {
    type Error = DomainError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SalesHistory> for Vec<f64> {
    fn from(value: SalesHistory) -> Self {
        value.0.to_vec()
    }
}

impl FromIterator<u32> for SalesHistory {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        // Whole unit counts are always finite and non-negative.
        Self(iter.into_iter().map(f64::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite_observations() {
        assert!(SalesHistory::new(vec![1.0, -0.5]).is_err());
        assert!(SalesHistory::new(vec![f64::NAN]).is_err());
        assert!(SalesHistory::new(vec![f64::INFINITY, 2.0]).is_err());
    }

    #[test]
    fn empty_history_is_valid_with_zero_mean() {
        let h = SalesHistory::new(Vec::new()).unwrap();
        assert!(h.is_empty());
        assert_eq!(h.mean(), 0.0);
    }

    #[test]
    fn clones_share_the_same_buffer() {
        let h: SalesHistory = [3u32, 4, 5].into_iter().collect();
        let c = h.clone();
        assert!(std::ptr::eq(h.values().as_ptr(), c.values().as_ptr()));
        assert_eq!(c.mean(), 4.0);
    }

    #[test]
    fn deserialization_validates() {
        let ok: SalesHistory = serde_json::from_str("[1.0, 2.5]").unwrap();
        assert_eq!(ok.values(), &[1.0, 2.5]);
        assert!(serde_json::from_str::<SalesHistory>("[1.0, -2.0]").is_err());
    }
}

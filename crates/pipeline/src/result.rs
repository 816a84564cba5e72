use serde::{Deserialize, Serialize};

use stockcast_core::{Category, Forecast, MaterialId};
use stockcast_forecast::{ForecastMethod, Strategy};

/// Outcome of one material's pipeline run, handed to the caller for
/// persistence or reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub material_id: MaterialId,
    pub category: Category,
    pub forecast: Forecast,
    pub recommendation: String,
    pub strategy: Strategy,
    pub method: ForecastMethod,
}

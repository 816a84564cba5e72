use async_trait::async_trait;

use stockcast_core::{Category, Forecast, SalesHistory};

use crate::error::ServiceError;

/// Yields a demand-category label for a sales history.
///
/// The label is free text; callers must not assume exact spelling or case.
#[async_trait]
pub trait ClassificationPort: Send + Sync {
    async fn classify(&self, history: &SalesHistory) -> Result<String, ServiceError>;
}

/// Yields a short recommended inventory action for a forecast.
#[async_trait]
pub trait RecommendationPort: Send + Sync {
    async fn recommend(
        &self,
        forecast: &Forecast,
        category: &Category,
    ) -> Result<String, ServiceError>;
}

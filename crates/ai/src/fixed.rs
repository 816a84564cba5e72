//! Ports that answer with a preconfigured response (tests, dry runs).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use stockcast_core::{Category, Forecast, SalesHistory};

use crate::error::ServiceError;
use crate::port::{ClassificationPort, RecommendationPort};

#[derive(Debug)]
struct Fixed {
    response: Result<String, ServiceError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Fixed {
    fn new(response: Result<String, ServiceError>) -> Self {
        Self {
            response,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    async fn answer(&self) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

/// Classifier returning the same label (or error) for every history.
#[derive(Debug)]
pub struct FixedClassifier(Fixed);

impl FixedClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self(Fixed::new(Ok(label.into())))
    }

    pub fn failing(err: ServiceError) -> Self {
        Self(Fixed::new(Err(err)))
    }

    /// Sleep before answering (exercises caller timeouts).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationPort for FixedClassifier {
    async fn classify(&self, _history: &SalesHistory) -> Result<String, ServiceError> {
        self.0.answer().await
    }
}

/// Recommender returning the same action (or error) for every forecast.
#[derive(Debug)]
pub struct FixedRecommender(Fixed);

impl FixedRecommender {
    pub fn new(action: impl Into<String>) -> Self {
        Self(Fixed::new(Ok(action.into())))
    }

    pub fn failing(err: ServiceError) -> Self {
        Self(Fixed::new(Err(err)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendationPort for FixedRecommender {
    async fn recommend(
        &self,
        _forecast: &Forecast,
        _category: &Category,
    ) -> Result<String, ServiceError> {
        self.0.answer().await
    }
}

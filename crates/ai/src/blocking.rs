//! Adapters for synchronous port implementations.
//!
//! A blocking classifier or recommender (local model, CLI wrapper, ...) is
//! run on tokio's blocking pool so it never stalls the async workers.

use std::sync::Arc;

use async_trait::async_trait;

use stockcast_core::{Category, Forecast, SalesHistory};

use crate::error::ServiceError;
use crate::port::{ClassificationPort, RecommendationPort};

/// Synchronous counterpart of [`ClassificationPort`].
pub trait SyncClassifier: Send + Sync + 'static {
    fn classify(&self, history: &SalesHistory) -> Result<String, ServiceError>;
}

/// Synchronous counterpart of [`RecommendationPort`].
pub trait SyncRecommender: Send + Sync + 'static {
    fn recommend(&self, forecast: &Forecast, category: &Category) -> Result<String, ServiceError>;
}

/// Exposes a synchronous implementation through the async port traits.
#[derive(Debug)]
pub struct Blocking<T>(Arc<T>);

impl<T> Blocking<T> {
    pub fn new(inner: T) -> Self {
        Self(Arc::new(inner))
    }
}

impl<T> Clone for Blocking<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

fn join_error(err: tokio::task::JoinError) -> ServiceError {
    ServiceError::Transport(format!("blocking port call did not complete: {err}"))
}

#[async_trait]
impl<T: SyncClassifier> ClassificationPort for Blocking<T> {
    async fn classify(&self, history: &SalesHistory) -> Result<String, ServiceError> {
        let inner = Arc::clone(&self.0);
        let history = history.clone();
        tokio::task::spawn_blocking(move || inner.classify(&history))
            .await
            .map_err(join_error)?
    }
}

#[async_trait]
impl<T: SyncRecommender> RecommendationPort for Blocking<T> {
    async fn recommend(
        &self,
        forecast: &Forecast,
        category: &Category,
    ) -> Result<String, ServiceError> {
        let inner = Arc::clone(&self.0);
        let forecast = *forecast;
        let category = category.clone();
        tokio::task::spawn_blocking(move || inner.recommend(&forecast, &category))
            .await
            .map_err(join_error)?
    }
}

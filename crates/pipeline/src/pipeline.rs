use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use stockcast_ai::{ClassificationPort, RecommendationPort, ServiceError};
use stockcast_core::{Category, MaterialId, RunId, SalesHistory};
use stockcast_forecast::{ForecastError, ForecastOutcome, StrategySelector};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::result::ForecastResult;

/// Classification → strategy selection → forecast → recommendation.
///
/// Holds no per-material state: one instance can serve many concurrent runs.
/// Cloning is cheap (shared ports and selector).
#[derive(Clone)]
pub struct InventoryPipeline {
    classifier: Arc<dyn ClassificationPort>,
    recommender: Arc<dyn RecommendationPort>,
    selector: Arc<StrategySelector>,
    config: PipelineConfig,
}

impl InventoryPipeline {
    pub fn new(
        classifier: Arc<dyn ClassificationPort>,
        recommender: Arc<dyn RecommendationPort>,
        config: PipelineConfig,
    ) -> Self {
        let selector = StrategySelector::new().with_fit_failure(config.fit_failure);
        Self {
            classifier,
            recommender,
            selector: Arc::new(selector),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all stages for one material.
    pub async fn run(
        &self,
        material_id: &MaterialId,
        history: &SalesHistory,
    ) -> Result<ForecastResult, PipelineError> {
        let run_id = RunId::new();
        let span = info_span!("pipeline.run", material = %material_id, run_id = %run_id);

        async move {
            let result = self.run_stages(material_id, history).await;
            match &result {
                Ok(r) => info!(
                    category = %r.category,
                    strategy = %r.strategy,
                    method = %r.method,
                    forecast = %r.forecast,
                    "material forecast completed"
                ),
                Err(e) => warn!(stage = %e.stage(), error = %e, "material forecast failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_stages(
        &self,
        material_id: &MaterialId,
        history: &SalesHistory,
    ) -> Result<ForecastResult, PipelineError> {
        // 1) Classify.
        let category = self.classify(history).await?;
        debug!(category = %category, observations = history.len(), "material classified");

        // 2) Select strategy and forecast.
        let outcome = self.forecast(&category, history).await?;

        // 3) Recommend.
        let recommendation = self.recommend(&outcome, &category).await?;

        // 4) Assemble.
        Ok(ForecastResult {
            material_id: material_id.clone(),
            category,
            forecast: outcome.forecast,
            recommendation,
            strategy: outcome.strategy,
            method: outcome.method,
        })
    }

    async fn classify(&self, history: &SalesHistory) -> Result<Category, PipelineError> {
        let limit = self.config.classify_timeout;
        let label = tokio::time::timeout(limit, self.classifier.classify(history))
            .await
            .map_err(|_| ServiceError::Timeout(limit))
            .and_then(|r| r)
            .map_err(PipelineError::Classification)?;
        Ok(Category::new(label))
    }

    /// Model fitting is CPU-bound; it runs on the blocking pool under
    /// `fit_timeout`. A timed-out fit is abandoned, not cancelled.
    async fn forecast(
        &self,
        category: &Category,
        history: &SalesHistory,
    ) -> Result<ForecastOutcome, PipelineError> {
        let limit = self.config.fit_timeout;
        let selector = Arc::clone(&self.selector);
        let category = category.clone();
        let history = history.clone();

        let task = tokio::task::spawn_blocking(move || selector.forecast(&category, &history));
        match tokio::time::timeout(limit, task).await {
            Err(_) => Err(PipelineError::Forecast(ForecastError::TimedOut(limit))),
            Ok(Err(join)) => Err(PipelineError::Forecast(ForecastError::ContractViolation(
                format!("forecast task did not complete: {join}"),
            ))),
            Ok(Ok(outcome)) => outcome.map_err(PipelineError::Forecast),
        }
    }

    async fn recommend(
        &self,
        outcome: &ForecastOutcome,
        category: &Category,
    ) -> Result<String, PipelineError> {
        let limit = self.config.recommend_timeout;
        let text = tokio::time::timeout(
            limit,
            self.recommender.recommend(&outcome.forecast, category),
        )
        .await
        .map_err(|_| ServiceError::Timeout(limit))
        .and_then(|r| r)
        .map_err(PipelineError::Recommendation)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::ContractViolation(
                "recommendation port returned blank text".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use stockcast_ai::{FixedClassifier, FixedRecommender};
    use stockcast_core::Forecast;
    use stockcast_forecast::{FitFailurePolicy, ForecastMethod, Strategy};

    use super::*;
    use crate::error::Stage;

    fn material() -> MaterialId {
        MaterialId::new("MAT-001").unwrap()
    }

    fn history(values: &[u32]) -> SalesHistory {
        values.iter().copied().collect()
    }

    fn pipeline(
        classifier: FixedClassifier,
        recommender: FixedRecommender,
        config: PipelineConfig,
    ) -> InventoryPipeline {
        InventoryPipeline::new(Arc::new(classifier), Arc::new(recommender), config)
    }

    #[tokio::test]
    async fn assembles_result_from_all_stages() {
        let p = pipeline(
            FixedClassifier::new("Fast-Moving"),
            FixedRecommender::new("  Maintain stock  "),
            PipelineConfig::default(),
        );
        let r = p.run(&material(), &history(&[10, 12, 11, 13, 12, 14])).await.unwrap();

        assert_eq!(r.material_id, material());
        assert_eq!(r.category.as_str(), "Fast-Moving");
        assert_eq!(r.forecast, Forecast::flat(12));
        assert_eq!(r.recommendation, "Maintain stock");
        assert_eq!(r.strategy, Strategy::SmoothedAverage);
        assert_eq!(r.method, ForecastMethod::MovingAverage);
    }

    #[tokio::test]
    async fn classification_failure_skips_later_stages() {
        let recommender = Arc::new(FixedRecommender::new("Reorder"));
        let p = InventoryPipeline::new(
            Arc::new(FixedClassifier::failing(ServiceError::Auth("bad key".into()))),
            recommender.clone(),
            PipelineConfig::default(),
        );
        let err = p.run(&material(), &history(&[1, 2, 3])).await.unwrap_err();

        assert_eq!(err.stage(), Stage::Classify);
        assert!(err.is_service_error());
        assert_eq!(recommender.calls(), 0);
    }

    #[tokio::test]
    async fn recommendation_failure_has_no_partial_result() {
        let p = pipeline(
            FixedClassifier::new("Seasonal"),
            FixedRecommender::failing(ServiceError::Transport("connection reset".into())),
            PipelineConfig::default(),
        );
        let err = p.run(&material(), &history(&[5, 6, 7, 8, 9])).await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Recommendation(ServiceError::Transport("connection reset".into()))
        );
    }

    #[tokio::test]
    async fn slow_classification_times_out_as_service_error() {
        let limit = Duration::from_millis(20);
        let p = pipeline(
            FixedClassifier::new("Seasonal").with_delay(Duration::from_secs(5)),
            FixedRecommender::new("Hold"),
            PipelineConfig::default().with_classify_timeout(limit),
        );
        let err = p.run(&material(), &history(&[1, 2])).await.unwrap_err();
        assert_eq!(err, PipelineError::Classification(ServiceError::Timeout(limit)));
    }

    #[tokio::test]
    async fn slow_recommendation_times_out_as_service_error() {
        let limit = Duration::from_millis(20);
        let p = pipeline(
            FixedClassifier::new("Seasonal"),
            FixedRecommender::new("Hold").with_delay(Duration::from_secs(5)),
            PipelineConfig::default().with_recommend_timeout(limit),
        );
        let err = p.run(&material(), &history(&[1, 2])).await.unwrap_err();
        assert_eq!(err, PipelineError::Recommendation(ServiceError::Timeout(limit)));
    }

    #[tokio::test]
    async fn slow_model_fit_times_out_in_forecast_stage() {
        let recommender = Arc::new(FixedRecommender::new("Hold"));
        let p = InventoryPipeline::new(
            Arc::new(FixedClassifier::new("Seasonal")),
            recommender.clone(),
            PipelineConfig::default().with_fit_timeout(Duration::ZERO),
        );
        let long: SalesHistory = (0..5000u32).map(|i| 100 + i % 12).collect();
        let err = p.run(&material(), &long).await.unwrap_err();

        assert!(matches!(err, PipelineError::Forecast(ForecastError::TimedOut(_))));
        assert_eq!(err.stage(), Stage::Forecast);
        assert!(!err.is_service_error());
        assert_eq!(recommender.calls(), 0);
    }

    #[tokio::test]
    async fn blank_recommendation_is_a_contract_violation() {
        let p = pipeline(
            FixedClassifier::new("Seasonal"),
            FixedRecommender::new("   "),
            PipelineConfig::default(),
        );
        let err = p.run(&material(), &history(&[1, 2])).await.unwrap_err();
        assert!(matches!(err, PipelineError::ContractViolation(_)));
        assert_eq!(err.stage(), Stage::Assemble);
    }

    #[tokio::test]
    async fn fit_failure_policy_flows_from_config() {
        let p = pipeline(
            FixedClassifier::new("Slow-Moving"),
            FixedRecommender::new("Reduce stock"),
            PipelineConfig::default().with_fit_failure(FitFailurePolicy::DegradeToMean),
        );
        let r = p.run(&material(), &history(&[3; 16])).await.unwrap();
        assert_eq!(r.method, ForecastMethod::DegradedMean);
        assert_eq!(r.forecast, Forecast::flat(3));
    }
}

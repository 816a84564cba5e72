//! Concurrent execution of independent materials.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::info;

use stockcast_core::{MaterialId, SalesHistory};

use crate::error::PipelineError;
use crate::pipeline::InventoryPipeline;
use crate::result::ForecastResult;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum materials in flight at once (at least 1).
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

impl BatchConfig {
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }
}

/// Result of one material within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialOutcome {
    pub material_id: MaterialId,
    pub result: Result<ForecastResult, PipelineError>,
}

impl InventoryPipeline {
    /// Run every material, at most `max_concurrent` at a time.
    ///
    /// Outcomes come back in input order. A failing material never affects
    /// the others; deciding what to do with failures is up to the caller.
    pub async fn run_batch(
        &self,
        materials: Vec<(MaterialId, SalesHistory)>,
        config: &BatchConfig,
    ) -> Vec<MaterialOutcome> {
        let total = materials.len();
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        info!(materials = total, max_concurrent = config.max_concurrent, "forecast batch started");

        let mut handles = Vec::with_capacity(total);
        for (material_id, history) in materials {
            let pipeline = self.clone();
            let permits = Arc::clone(&permits);
            let id = material_id.clone();
            let handle = tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return Err(PipelineError::ContractViolation(
                        "batch concurrency limiter closed".to_string(),
                    ));
                };
                pipeline.run(&id, &history).await
            });
            handles.push((material_id, handle));
        }

        let mut outcomes = Vec::with_capacity(total);
        for (material_id, handle) in handles {
            let result = handle.await.unwrap_or_else(|join| {
                Err(PipelineError::ContractViolation(format!(
                    "material task did not complete: {join}"
                )))
            });
            outcomes.push(MaterialOutcome { material_id, result });
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(materials = total, failed, "forecast batch finished");
        outcomes
    }
}

use std::time::Duration;

use stockcast_forecast::FitFailurePolicy;

/// Per-run limits and policies.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound on the classification call.
    pub classify_timeout: Duration,
    /// Bound on the recommendation call.
    pub recommend_timeout: Duration,
    /// Bound on strategy selection + model fitting.
    pub fit_timeout: Duration,
    pub fit_failure: FitFailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classify_timeout: Duration::from_secs(30),
            recommend_timeout: Duration::from_secs(30),
            fit_timeout: Duration::from_secs(60),
            fit_failure: FitFailurePolicy::Abort,
        }
    }
}

impl PipelineConfig {
    pub fn with_classify_timeout(mut self, timeout: Duration) -> Self {
        self.classify_timeout = timeout;
        self
    }

    pub fn with_recommend_timeout(mut self, timeout: Duration) -> Self {
        self.recommend_timeout = timeout;
        self
    }

    pub fn with_fit_timeout(mut self, timeout: Duration) -> Self {
        self.fit_timeout = timeout;
        self
    }

    pub fn with_fit_failure(mut self, policy: FitFailurePolicy) -> Self {
        self.fit_failure = policy;
        self
    }
}

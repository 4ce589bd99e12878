//! Inference Engine

use crate::{
    features::RiskInput,
    models::{ModelFile, ModelSource, ScoringModel},
    ScoringError,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// When the scoring model is read from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Load the model for every request; nothing is shared
    #[default]
    PerRequest,
    /// Load once, keep it until an explicit reload
    Cached,
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPolicy::PerRequest => f.write_str("per-request"),
            LoadPolicy::Cached => f.write_str("cached"),
        }
    }
}

/// Scoring response body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskOutput {
    /// Probability of the middle risk class; always equal to
    /// `severity_probabilities.medium`
    pub risk_score: f64,
    /// Per-class probabilities
    pub severity_probabilities: SeverityProbabilities,
}

/// Probabilities for the three ordered risk classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityProbabilities {
    /// Class 0
    pub low: f64,
    /// Class 1
    pub medium: f64,
    /// Class 2
    pub high: f64,
}

impl RiskOutput {
    /// Shape a class-probability vector. Classes are positional: index 0
    /// is low, 1 medium (also reported as `risk_score`), 2 high.
    pub fn from_probabilities(probs: &[f64]) -> Result<Self, ScoringError> {
        match *probs {
            [low, medium, high, ..] => Ok(Self {
                risk_score: medium,
                severity_probabilities: SeverityProbabilities { low, medium, high },
            }),
            _ => Err(ScoringError::ClassCount { found: probs.len() }),
        }
    }
}

/// Risk scorer: owns the model source and the load policy.
pub struct RiskScorer {
    source: Arc<dyn ModelSource>,
    policy: LoadPolicy,
    cached: RwLock<Option<Arc<dyn ScoringModel>>>,
    stats: RwLock<ScoringStats>,
}

impl RiskScorer {
    /// Scorer over any model source.
    pub fn new(source: Arc<dyn ModelSource>, policy: LoadPolicy) -> Self {
        Self {
            source,
            policy,
            cached: RwLock::new(None),
            stats: RwLock::new(ScoringStats::default()),
        }
    }

    /// Scorer backed by an XGBoost JSON file.
    pub fn from_path(path: impl AsRef<Path>, policy: LoadPolicy) -> Self {
        Self::new(Arc::new(ModelFile::new(path.as_ref())), policy)
    }

    /// Configured load policy.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Score a validated input. Blocking: may read the model from disk.
    pub fn score(&self, input: &RiskInput) -> Result<RiskOutput, ScoringError> {
        let start = Instant::now();
        let result = self.model().and_then(|model| {
            let row = input.to_feature_row();
            let probs = model.predict_proba(&row)?;
            RiskOutput::from_probabilities(&probs)
        });

        let elapsed = start.elapsed();
        let mut stats = self.stats.write();
        stats.total_requests += 1;
        stats.total_latency_us += elapsed.as_micros() as u64;
        match &result {
            Ok(_) => stats.successful += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!("Scoring failed: {}", e);
            }
        }

        result
    }

    /// Re-read the model from its source.
    ///
    /// With [`LoadPolicy::Cached`] a successful reload replaces the cached
    /// model and a failed one empties the cache, so the next request tries
    /// again and reports the failure. With [`LoadPolicy::PerRequest`] this
    /// only checks that the artifact loads.
    pub fn reload(&self) -> Result<(), ScoringError> {
        tracing::info!("Reloading model from {}", self.source.location());
        let loaded = self.load();
        if self.policy == LoadPolicy::Cached {
            *self.cached.write() = loaded.as_ref().ok().cloned();
        }
        loaded.map(|_| tracing::info!("Model reloaded successfully"))
    }

    /// Whether a model is currently cached.
    pub fn is_cached(&self) -> bool {
        self.cached.read().is_some()
    }

    /// Get scoring stats
    pub fn stats(&self) -> ScoringStats {
        self.stats.read().clone()
    }

    fn model(&self) -> Result<Arc<dyn ScoringModel>, ScoringError> {
        match self.policy {
            LoadPolicy::PerRequest => self.load(),
            LoadPolicy::Cached => {
                if let Some(model) = self.cached.read().as_ref() {
                    return Ok(Arc::clone(model));
                }
                let mut slot = self.cached.write();
                if let Some(model) = slot.as_ref() {
                    return Ok(Arc::clone(model));
                }
                let model = self.load()?;
                *slot = Some(Arc::clone(&model));
                Ok(model)
            }
        }
    }

    fn load(&self) -> Result<Arc<dyn ScoringModel>, ScoringError> {
        let location = self.source.location();
        let model = self
            .source
            .load()
            .map_err(|source| ScoringError::Load { location: location.clone(), source })?;
        self.stats.write().model_loads += 1;
        tracing::debug!("Loaded model from {}", location);
        Ok(model)
    }
}

/// Scoring statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoringStats {
    /// Scoring calls made
    pub total_requests: u64,
    /// Calls that returned probabilities
    pub successful: u64,
    /// Calls that returned a `ScoringError`
    pub failed: u64,
    /// Successful artifact loads
    pub model_loads: u64,
    /// Summed scoring latency
    pub total_latency_us: u64,
}

impl ScoringStats {
    /// Average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        if self.total_requests == 0 { 0.0 }
        else { self.total_latency_us as f64 / self.total_requests as f64 }
    }
}

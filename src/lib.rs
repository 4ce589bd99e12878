//! Accident Risk Prediction API
//!
//! Scores an accident-context record against a pre-trained XGBoost
//! classifier and returns per-severity probabilities.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RISK SCORING SERVICE                              │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │  POST        │  │  GET         │  │  POST        │                  │
//! │  │ /predict_risk│  │ /health      │  │ /reload_model│                  │
//! │  │              │  │ /stats       │  │              │                  │
//! │  └──────┬───────┘  └──────────────┘  └──────┬───────┘                  │
//! │         │                                   │                          │
//! │  ┌──────▼───────────────────────────────────▼────────────────────────┐ │
//! │  │                    VALIDATION (RiskInput)                         │ │
//! │  │        defaults | integer coercion | per-field errors (422)       │ │
//! │  └──────────────────────────────┬────────────────────────────────────┘ │
//! │                                 │                                      │
//! │  ┌──────────────────────────────▼────────────────────────────────────┐ │
//! │  │                    RISK SCORER                                    │ │
//! │  │     load policy (per-request | cached) | feature row | stats      │ │
//! │  └──────────────────────────────┬────────────────────────────────────┘ │
//! │                                 │                                      │
//! │  ┌──────────────────────────────▼────────────────────────────────────┐ │
//! │  │                    XGBOOST BOOSTER (JSON)                         │ │
//! │  │          tree traversal | softmax / logistic output               │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`revenue`] module holds the unrelated CSV revenue adjuster that
//! ships as the `revenue-adjust` binary.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod features;
pub mod inference;
pub mod models;
pub mod revenue;

use thiserror::Error;

pub use api::{build_router, AppState};
pub use config::{ConfigOverrides, ServiceConfig};
pub use features::{FeatureRow, FieldError, RiskInput, ValidationErrors, FEATURE_COLUMNS};
pub use inference::{LoadPolicy, RiskOutput, RiskScorer, ScoringStats, SeverityProbabilities};
pub use models::{Booster, ModelFile, ModelSource, ScoringModel};

/// Scoring model errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact could not be read
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Artifact is not valid JSON or lacks required fields
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Structurally inconsistent model
    #[error("invalid model: {0}")]
    Invalid(String),
    /// Model uses a feature the evaluator does not implement
    #[error("unsupported {what}: {name}")]
    Unsupported {
        /// Kind of feature, e.g. `objective`
        what: &'static str,
        /// Value found in the artifact
        name: String,
    },
    /// Row column names differ from the model's `feature_names`
    #[error("feature_names mismatch: expected {expected:?}, got {found:?}")]
    FeatureNames {
        /// Names recorded in the model
        expected: Vec<String>,
        /// Names of the row
        found: Vec<String>,
    },
    /// Row width differs from the model's `num_feature`
    #[error("feature shape mismatch, expected: {expected}, got {found}")]
    Shape {
        /// Model width
        expected: usize,
        /// Row width
        found: usize,
    },
}

/// Errors raised while scoring a validated input.
///
/// The `Display` text is what callers receive in the `detail` field of a
/// 500 response.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Model artifact failed to load
    #[error("failed to load model from {location}: {source}")]
    Load {
        /// Where the model was read from
        location: String,
        /// Underlying failure
        #[source]
        source: ModelError,
    },
    /// Model rejected the feature row
    #[error("{0}")]
    Predict(#[from] ModelError),
    /// Too few classes to fill low / medium / high
    #[error("model returned {found} class probabilities, at least 3 are required")]
    ClassCount {
        /// Number of probabilities returned
        found: usize,
    },
    /// Blocking scoring task panicked or was cancelled
    #[error("scoring task failed: {0}")]
    Task(String),
}

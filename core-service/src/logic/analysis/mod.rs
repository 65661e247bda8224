//! Analysis Module
//!
//! Data model of an analysis run plus the mock generator used before any
//! real upload.
//!
//! ## Structure
//! - `types`: AnalysisResult, PredictionRecord, TransactionRecord, metrics
//! - `mock`: synthetic dataset generator
//! - `explain`: explanation input fallback and text cleanup

pub mod types;
pub mod mock;
pub mod explain;

pub use types::{
    AnalysisResult,
    DataSource,
    ModelMetrics,
    PredictionRecord,
    SessionInfo,
    TopFeature,
    TransactionRecord,
    DEFAULT_MODEL_METRICS,
    FEATURE_IMPORTANCE,
    feature_importance,
};

pub use mock::{generate_mock_analysis, generate_mock_analysis_with};
pub use explain::{clean_explanation, explanation_input};

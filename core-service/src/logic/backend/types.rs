//! Backend Types
//!
//! Wire shapes of the FastAPI backend (snake_case) and their mapping onto the
//! internal analysis model, plus the tagged response handed to callers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::BackendError;
use crate::logic::analysis::{AnalysisResult, ModelMetrics, PredictionRecord, TopFeature, TransactionRecord};

// ============================================================================
// TAGGED RESPONSE
// ============================================================================

/// Result envelope returned by every backend operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| "Unknown error occurred".to_string())),
        }
    }
}

impl<T> From<Result<T, BackendError>> for ApiResponse<T> {
    fn from(result: Result<T, BackendError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

// ============================================================================
// PREDICTIONS (wire)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePrediction {
    pub is_fraud: bool,
    pub fraud_probability: f64,
    pub risk_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub top_features: Vec<TopFeature>,
}

impl From<&PredictionRecord> for WirePrediction {
    fn from(p: &PredictionRecord) -> Self {
        Self {
            is_fraud: p.is_fraud,
            fraud_probability: p.fraud_probability,
            risk_score: p.risk_score,
            confidence: p.confidence,
            explanation: p.explanation.clone(),
            top_features: p.top_features.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WireMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
    pub pr_auc: Option<f64>,
}

impl From<WireMetrics> for ModelMetrics {
    fn from(m: WireMetrics) -> Self {
        Self {
            roc_auc: m.roc_auc,
            // Older backends do not report PR-AUC, precision stands in
            pr_auc: m.pr_auc.unwrap_or(m.precision),
            f1_score: m.f1_score,
            recall: m.recall,
            precision: m.precision,
            accuracy: m.accuracy,
        }
    }
}

/// Body of `/predict/batch` and the `results` field of `/upload`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireAnalysis {
    pub predictions: Vec<WirePrediction>,
    #[serde(default)]
    pub model_metrics: WireMetrics,
    #[serde(default)]
    pub processing_time: f64,
    pub total_records: usize,
    pub fraud_count: usize,
}

impl WireAnalysis {
    /// Map onto the internal shape. `originals[i]` becomes the original data
    /// of prediction `i`; missing rows default.
    pub fn into_analysis(self, originals: &[TransactionRecord]) -> AnalysisResult {
        let predictions = self
            .predictions
            .into_iter()
            .enumerate()
            .map(|(i, p)| PredictionRecord {
                is_fraud: p.is_fraud,
                fraud_probability: p.fraud_probability,
                risk_score: p.risk_score,
                confidence: p.confidence,
                explanation: p.explanation,
                top_features: p.top_features,
                original_data: originals.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        AnalysisResult {
            predictions,
            model_metrics: self.model_metrics.into(),
            processing_time: self.processing_time,
            total_records: self.total_records,
            fraud_count: self.fraud_count,
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BatchPredictionRequest<'a> {
    pub transactions: &'a [TransactionRecord],
    pub include_explanations: bool,
}

#[derive(Debug, Serialize)]
pub struct ExplainRequest<'a> {
    pub transaction_data: &'a TransactionRecord,
    pub prediction: WirePrediction,
}

// ============================================================================
// RESPONSES
// ============================================================================

/// `/upload` returns the file metadata with the analysis nested in `results`
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub results: Option<WireAnalysis>,
}

/// Generated explanation for one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
    #[serde(default)]
    pub processing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_version: String,
    pub model_type: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub metrics: ModelMetrics,
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudStats {
    pub total_transactions: u64,
    pub fraud_count: u64,
    pub fraud_rate: f64,
    pub last_24h_fraud: u64,
    pub last_7d_fraud: u64,
    pub avg_processing_time: f64,
}

// ============================================================================
// UPLOAD PROGRESS
// ============================================================================

/// Bytes handed to the transport so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Percentage in 0..=100
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.sent.min(self.total) * 100) / self.total) as u8
    }
}

/// Callback receiving upload progress events
pub type ProgressObserver = Arc<dyn Fn(UploadProgress) + Send + Sync>;

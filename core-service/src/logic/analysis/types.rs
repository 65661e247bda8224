//! Analysis Types
//!
//! Internal (camelCase) shape of an analysis run as the dashboard consumes it.
//! No logic here - only data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION RECORD
// ============================================================================

/// One row of the bank-account-opening-fraud dataset.
///
/// Field names match the dataset columns. Every field defaults when absent,
/// the upload endpoint returns predictions without the original rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    pub customer_age: u32,
    pub income: f64,
    pub name_email_similarity: f64,

    pub prev_address_months_count: i64,
    pub current_address_months_count: i64,

    pub days_since_request: f64,
    pub intended_balcon_amount: f64,
    pub proposed_credit_limit: f64,

    /// AA, AB, AC, ...
    pub payment_type: String,
    pub bank_months_count: i64,
    pub has_other_cards: u8,
    pub foreign_request: u8,

    pub velocity_6h: f64,
    pub velocity_24h: f64,
    pub velocity_4w: f64,

    pub zip_count_4w: u32,
    pub bank_branch_count_8w: u32,
    pub date_of_birth_distinct_emails_4w: u32,

    pub credit_risk_score: i64,
    /// CA, CB, CC, ...
    pub employment_status: String,
    /// BA, BB, BC, ...
    pub housing_status: String,

    pub email_is_free: u8,
    pub phone_home_valid: u8,
    pub phone_mobile_valid: u8,

    /// INTERNET, MOBILE, BRANCH, ATM
    pub source: String,
    pub session_length_in_minutes: f64,
    /// windows, mac, linux, android, ios, other
    pub device_os: String,
    pub keep_alive_session: u8,
    pub device_distinct_emails_8w: u32,
    pub device_fraud_count: u32,

    /// 0-11
    pub month: u8,

    /// Only present in labelled training data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_bool: Option<u8>,
}

// ============================================================================
// PREDICTIONS
// ============================================================================

/// A feature and its contribution to a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFeature {
    pub feature: String,
    pub importance: f64,
    pub value: f64,
}

impl TopFeature {
    pub fn new(feature: &str, importance: f64, value: f64) -> Self {
        Self {
            feature: feature.to_string(),
            importance,
            value,
        }
    }
}

/// Model verdict for one transaction, together with the row it was made for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub is_fraud: bool,
    pub fraud_probability: f64,
    pub risk_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub top_features: Vec<TopFeature>,
    #[serde(default)]
    pub original_data: TransactionRecord,
}

// ============================================================================
// MODEL METRICS
// ============================================================================

/// Evaluation ratios of the scoring model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelMetrics {
    #[serde(alias = "roc_auc")]
    pub roc_auc: f64,
    #[serde(alias = "pr_auc")]
    pub pr_auc: f64,
    #[serde(alias = "f1_score")]
    pub f1_score: f64,
    pub recall: f64,
    pub precision: f64,
    pub accuracy: f64,
}

/// Reference metrics of the production model
pub const DEFAULT_MODEL_METRICS: ModelMetrics = ModelMetrics {
    roc_auc: 0.9465,
    pr_auc: 0.5476,
    f1_score: 0.3823,
    recall: 0.8586,
    precision: 0.2459,
    accuracy: 0.9016,
};

impl Default for ModelMetrics {
    fn default() -> Self {
        DEFAULT_MODEL_METRICS
    }
}

/// Global feature importance of the production model, descending
pub const FEATURE_IMPORTANCE: [(&str, f64); 20] = [
    ("velocity_6h", 0.18),
    ("velocity_24h", 0.15),
    ("device_fraud_count", 0.12),
    ("credit_risk_score", 0.11),
    ("session_length_in_minutes", 0.09),
    ("bank_months_count", 0.08),
    ("customer_age", 0.07),
    ("proposed_credit_limit", 0.06),
    ("velocity_4w", 0.05),
    ("zip_count_4w", 0.04),
    ("income", 0.03),
    ("name_email_similarity", 0.02),
    ("current_address_months_count", 0.02),
    ("bank_branch_count_8w", 0.02),
    ("device_distinct_emails_8w", 0.02),
    ("payment_type", 0.02),
    ("employment_status", 0.01),
    ("housing_status", 0.01),
    ("source", 0.01),
    ("device_os", 0.01),
];

/// Importance of `feature` in the production model, 0.0 if unranked
pub fn feature_importance(feature: &str) -> f64 {
    FEATURE_IMPORTANCE
        .iter()
        .find(|(name, _)| *name == feature)
        .map(|(_, importance)| *importance)
        .unwrap_or(0.0)
}

// ============================================================================
// ANALYSIS RESULT
// ============================================================================

/// Everything one dashboard screen needs: predictions plus summary numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub predictions: Vec<PredictionRecord>,
    pub model_metrics: ModelMetrics,
    /// Seconds
    pub processing_time: f64,
    pub total_records: usize,
    pub fraud_count: usize,
}

impl AnalysisResult {
    /// Count of predictions flagged as fraud
    pub fn flagged_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_fraud).count()
    }

    /// `fraud_count` agrees with the predictions and stays within `total_records`
    pub fn is_consistent(&self) -> bool {
        self.fraud_count <= self.total_records && self.fraud_count == self.flagged_count()
    }
}

// ============================================================================
// SESSION INFO
// ============================================================================

/// Where the dashboard's current numbers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Locally generated synthetic data
    Mock,
    /// Results returned by the backend for an uploaded file
    Real,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Mock => "mock",
            DataSource::Real => "real",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of the session for status bars and headers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub has_uploaded_data: bool,
    pub last_updated: String,
    pub data_source: DataSource,
    pub total_records: usize,
    pub fraud_count: usize,
}

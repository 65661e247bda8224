//! Backend Module - Analysis Backend Proxy
//!
//! This module handles:
//! - Backend liveness (single `/health` probe, availability flag)
//! - Batch analysis, file upload, explanations, model info, statistics
//! - Translation of the snake_case wire shape into the internal model
//!
//! Every public operation returns an `ApiResponse`; nothing is thrown outward.

pub mod client;
pub mod error;
pub mod types;


pub use client::BackendClient;
pub use error::BackendError;
pub use types::{ApiResponse, Explanation, FraudStats, ModelInfo, ProgressObserver, UploadProgress};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::logic::analysis::{AnalysisResult, PredictionRecord, TransactionRecord};
use crate::logic::config::ServiceConfig;

/// Proxy to the analysis backend with a cached availability flag
pub struct BackendService {
    client: BackendClient,
    available: AtomicBool,
}

impl BackendService {
    /// Create the service. The backend counts as unavailable until the first
    /// health check succeeds.
    pub fn new(config: &ServiceConfig) -> Result<Self, BackendError> {
        Ok(Self::with_client(BackendClient::new(config)?))
    }

    pub fn with_client(client: BackendClient) -> Self {
        Self {
            client,
            available: AtomicBool::new(false),
        }
    }

    /// Create the service and run the initial health check
    pub async fn connect(config: &ServiceConfig) -> Result<Self, BackendError> {
        let service = Self::new(config)?;
        service.check_backend_health().await;
        Ok(service)
    }

    pub fn backend_url(&self) -> &str {
        self.client.base_url()
    }

    /// Result of the last health check
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// Probe `/health` once and update the availability flag
    pub async fn check_backend_health(&self) -> bool {
        log::debug!("Checking backend health at {}/health", self.client.base_url());

        let healthy = match self.client.health_check(None).await {
            Ok(()) => {
                log::info!("Backend is available: {}", self.client.base_url());
                true
            }
            Err(e) => {
                log::warn!("Backend not available: {}", e);
                false
            }
        };

        self.available.store(healthy, Ordering::Relaxed);
        healthy
    }

    /// Score transactions via `/predict/batch`
    pub async fn analyze_transactions(&self, records: &[TransactionRecord]) -> ApiResponse<AnalysisResult> {
        let result = match self.ensure_available() {
            Ok(()) => self.client.predict_batch(records).await,
            Err(e) => Err(e),
        };
        respond("analyzing transactions", result)
    }

    /// Upload a CSV (or JSON/XLSX) file and return the backend's analysis
    pub async fn upload_and_analyze(&self, path: &Path) -> ApiResponse<AnalysisResult> {
        self.upload(path, None).await
    }

    /// Same as `upload_and_analyze`, reporting progress as the body is sent
    pub async fn upload_and_analyze_with_progress(
        &self,
        path: &Path,
        observer: ProgressObserver,
    ) -> ApiResponse<AnalysisResult> {
        self.upload(path, Some(observer)).await
    }

    async fn upload(&self, path: &Path, observer: Option<ProgressObserver>) -> ApiResponse<AnalysisResult> {
        let result = match self.ensure_available() {
            Ok(()) => self.client.upload(path, observer).await,
            Err(e) => Err(e),
        };
        respond("processing upload", result)
    }

    /// Generate a natural-language explanation for one prediction
    pub async fn generate_explanation(
        &self,
        transaction: &TransactionRecord,
        prediction: &PredictionRecord,
    ) -> ApiResponse<Explanation> {
        let result = match self.ensure_available() {
            Ok(()) => self.client.explain(transaction, prediction).await,
            Err(e) => Err(e),
        };
        respond("generating explanation", result)
    }

    /// Get model information
    pub async fn get_model_info(&self) -> ApiResponse<ModelInfo> {
        let result = match self.ensure_available() {
            Ok(()) => self.client.model_info().await,
            Err(e) => Err(e),
        };
        respond("getting model info", result)
    }

    /// Get fraud statistics
    pub async fn get_fraud_stats(&self) -> ApiResponse<FraudStats> {
        let result = match self.ensure_available() {
            Ok(()) => self.client.stats().await,
            Err(e) => Err(e),
        };
        respond("getting fraud stats", result)
    }

    fn ensure_available(&self) -> Result<(), BackendError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }
}

fn respond<T>(operation: &str, result: Result<T, BackendError>) -> ApiResponse<T> {
    if let Err(e) = &result {
        log::error!("Error {}: {}", operation, e);
    }
    result.into()
}

//! Backend API Client
//!
//! HTTP client for the FraudLens analysis backend. One call per method, no
//! retries. Errors are returned typed; turning them into tagged responses is
//! the service's job.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::BackendError;
use super::types::{
    BatchPredictionRequest, ExplainRequest, Explanation, FraudStats, ModelInfo, ProgressObserver,
    UploadProgress, UploadResponse, WireAnalysis, WirePrediction,
};
use crate::logic::analysis::{AnalysisResult, PredictionRecord, TransactionRecord};
use crate::logic::config::ServiceConfig;

/// Size of the chunks an upload body is streamed in
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Backend API client
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    /// Create new backend client
    pub fn new(config: &ServiceConfig) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.backend_timeout())
            .build()?;

        Ok(Self {
            base_url: config.backend_url.clone(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET `endpoint` and report the status. Any status is Ok, only
    /// transport failures are errors.
    pub async fn probe(&self, endpoint: &str, timeout: Duration) -> Result<StatusCode, BackendError> {
        let response = self
            .http_client
            .get(self.url(endpoint))
            .header(reqwest::header::ACCEPT, "text/html,application/json")
            .timeout(timeout)
            .send()
            .await?;

        Ok(response.status())
    }

    /// Check server health
    pub async fn health_check(&self, timeout: Option<Duration>) -> Result<(), BackendError> {
        let mut request = self.http_client.get(self.url("/health"));
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Server {
                status: response.status().as_u16(),
                body: String::new(),
            })
        }
    }

    /// Score a batch of transactions
    pub async fn predict_batch(&self, records: &[TransactionRecord]) -> Result<AnalysisResult, BackendError> {
        let request = BatchPredictionRequest {
            transactions: records,
            include_explanations: true,
        };

        let response = self
            .http_client
            .post(self.url("/predict/batch"))
            .json(&request)
            .send()
            .await?;

        let wire: WireAnalysis = read_json(response).await?;
        Ok(wire.into_analysis(records))
    }

    /// Upload a data file and return the analysis the backend ran on it
    pub async fn upload(
        &self,
        path: &Path,
        observer: Option<ProgressObserver>,
    ) -> Result<AnalysisResult, BackendError> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.csv".to_string());

        log::info!("Uploading {} ({} bytes) to {}", file_name, content.len(), self.base_url);

        let total = content.len() as u64;
        let part = Part::stream_with_length(progress_body(content, observer), total)
            .file_name(file_name.clone())
            .mime_str(mime_for(&file_name))?;
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = read_json(response).await?;
        let results = upload
            .results
            .ok_or_else(|| BackendError::InvalidResponse("upload".to_string()))?;

        log::debug!(
            "Upload processed: {} ({} bytes on server)",
            upload.filename.as_deref().unwrap_or(&file_name),
            upload.file_size.unwrap_or(total)
        );

        Ok(results.into_analysis(&[]))
    }

    /// Ask the backend to explain one prediction
    pub async fn explain(
        &self,
        transaction: &TransactionRecord,
        prediction: &PredictionRecord,
    ) -> Result<Explanation, BackendError> {
        let request = ExplainRequest {
            transaction_data: transaction,
            prediction: WirePrediction::from(prediction),
        };

        let response = self
            .http_client
            .post(self.url("/explain"))
            .json(&request)
            .send()
            .await?;

        read_json(response).await
    }

    /// Get model information
    pub async fn model_info(&self) -> Result<ModelInfo, BackendError> {
        let response = self.http_client.get(self.url("/model/info")).send().await?;
        read_json(response).await
    }

    /// Get fraud statistics
    pub async fn stats(&self) -> Result<FraudStats, BackendError> {
        let response = self.http_client.get(self.url("/stats")).send().await?;
        read_json(response).await
    }
}

/// Decode a 2xx JSON body, or turn the status and body text into an error
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Server {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::Parse(e.to_string()))
}

/// Stream `content` in chunks, notifying `observer` as each chunk is pulled
/// by the transport
fn progress_body(content: Vec<u8>, observer: Option<ProgressObserver>) -> Body {
    Body::wrap_stream(futures_util::stream::iter(progress_chunks(content, observer)))
}

/// Chunk iterator behind `progress_body`. Each chunk is copied out only when
/// pulled.
fn progress_chunks(
    content: Vec<u8>,
    observer: Option<ProgressObserver>,
) -> impl Iterator<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    let len = content.len();
    let total = len as u64;

    (0..len).step_by(UPLOAD_CHUNK_SIZE).map(move |start| {
        let end = (start + UPLOAD_CHUNK_SIZE).min(len);
        if let Some(observer) = &observer {
            observer(UploadProgress { sent: end as u64, total });
        }
        Ok(content[start..end].to_vec())
    })
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".csv") {
        "text/csv"
    } else if lower.ends_with(".json") {
        "application/json"
    } else if lower.ends_with(".xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("data.CSV"), "text/csv");
        assert_eq!(mime_for("rows.json"), "application/json");
        assert_eq!(mime_for("blob.bin"), "application/octet-stream");
    }

    #[test]
    fn test_progress_chunks_cover_content() {
        let content: Vec<u8> = (0..UPLOAD_CHUNK_SIZE * 2 + 10).map(|i| (i % 251) as u8).collect();
        let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let observer: ProgressObserver = {
            let seen = seen.clone();
            std::sync::Arc::new(move |p: UploadProgress| seen.lock().push(p.sent))
        };

        let chunks: Vec<Vec<u8>> = progress_chunks(content.clone(), Some(observer))
            .map(|c| c.unwrap())
            .collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 10);
        assert_eq!(chunks.concat(), content);
        let total = content.len() as u64;
        assert_eq!(*seen.lock(), vec![UPLOAD_CHUNK_SIZE as u64, 2 * UPLOAD_CHUNK_SIZE as u64, total]);
    }

    #[test]
    fn test_progress_chunks_empty_file() {
        assert_eq!(progress_chunks(Vec::new(), None).count(), 0);
    }

    #[test]
    fn test_url_joins_endpoint() {
        let client = BackendClient::new(&ServiceConfig::for_backend("http://localhost:8000/")).unwrap();
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}

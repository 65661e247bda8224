//! Dashboard API Commands
//!
//! Session and analysis commands behind the dashboard screens. Every command
//! that changes the session returns the refreshed view.

use std::path::Path;

use serde::Serialize;

use crate::context::AppContext;
use crate::logic::analysis::{
    clean_explanation, explanation_input, AnalysisResult, PredictionRecord, SessionInfo, TransactionRecord,
};
use crate::logic::backend::{ApiResponse, Explanation, ProgressObserver};

/// Columns of an uploadable CSV file, in dataset order
pub const CSV_COLUMNS: &[&str] = &[
    "customer_age",
    "income",
    "name_email_similarity",
    "prev_address_months_count",
    "current_address_months_count",
    "days_since_request",
    "intended_balcon_amount",
    "proposed_credit_limit",
    "payment_type",
    "bank_months_count",
    "has_other_cards",
    "foreign_request",
    "velocity_6h",
    "velocity_24h",
    "velocity_4w",
    "zip_count_4w",
    "bank_branch_count_8w",
    "date_of_birth_distinct_emails_4w",
    "credit_risk_score",
    "employment_status",
    "housing_status",
    "email_is_free",
    "phone_home_valid",
    "phone_mobile_valid",
    "source",
    "session_length_in_minutes",
    "device_os",
    "keep_alive_session",
    "device_distinct_emails_8w",
    "device_fraud_count",
    "month",
];

/// Dashboard data with its session summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub data: AnalysisResult,
    pub info: SessionInfo,
}

/// Get the current dashboard view
pub fn load(ctx: &AppContext) -> DashboardView {
    // One snapshot so data and info never disagree
    let snapshot = ctx.session().snapshot();
    DashboardView {
        data: snapshot.current().clone(),
        info: snapshot.info(),
    }
}

pub fn update_with_real_data(ctx: &AppContext, data: AnalysisResult) -> DashboardView {
    ctx.session().update_with_real_data(data);
    load(ctx)
}

pub fn reset_to_mock_data(ctx: &AppContext) -> DashboardView {
    ctx.session().reset_to_mock_data();
    load(ctx)
}

pub fn refresh_mock_data(ctx: &AppContext) -> DashboardView {
    ctx.session().refresh_mock_data();
    load(ctx)
}

pub fn clear_session(ctx: &AppContext) -> DashboardView {
    ctx.session().clear_session();
    load(ctx)
}

pub fn is_showing_real_data(ctx: &AppContext) -> bool {
    ctx.session().is_showing_real_data()
}

/// Header row of an empty upload template
pub fn sample_csv_template() -> String {
    format!("{}\n", CSV_COLUMNS.join(","))
}

/// Upload a file for analysis. On success the results become the session's
/// real data.
pub async fn upload_file(
    ctx: &AppContext,
    path: &Path,
    observer: Option<ProgressObserver>,
) -> ApiResponse<DashboardView> {
    reconnect_if_needed(ctx).await;

    let response = match observer {
        Some(observer) => ctx.backend().upload_and_analyze_with_progress(path, observer).await,
        None => ctx.backend().upload_and_analyze(path).await,
    };

    apply_analysis(ctx, response)
}

/// Score rows directly, without a file. On success the results become the
/// session's real data.
pub async fn analyze_records(ctx: &AppContext, records: &[TransactionRecord]) -> ApiResponse<DashboardView> {
    reconnect_if_needed(ctx).await;
    let response = ctx.backend().analyze_transactions(records).await;
    apply_analysis(ctx, response)
}

/// Explain the current dataset's prediction at `index`
pub async fn explain_prediction(ctx: &AppContext, index: usize) -> ApiResponse<Explanation> {
    let data = ctx.session().get_current_data();
    let Some(prediction) = data.predictions.get(index) else {
        return ApiResponse::err(format!(
            "No transaction at index {} ({} available)",
            index,
            data.predictions.len()
        ));
    };

    reconnect_if_needed(ctx).await;

    let transaction = explanation_input(prediction);
    // The backend writes the explanation, it never receives one
    let request = PredictionRecord {
        explanation: String::new(),
        ..prediction.clone()
    };

    ctx.backend()
        .generate_explanation(&transaction, &request)
        .await
        .map(|explanation| Explanation {
            explanation: clean_explanation(&explanation.explanation),
            ..explanation
        })
}

/// One more health check when the proxy last saw the backend down
async fn reconnect_if_needed(ctx: &AppContext) {
    if !ctx.backend().is_available() {
        log::info!("Backend not available, attempting to reconnect...");
        ctx.backend().check_backend_health().await;
    }
}

fn apply_analysis(ctx: &AppContext, response: ApiResponse<AnalysisResult>) -> ApiResponse<DashboardView> {
    match response.into_result() {
        Ok(result) => {
            ctx.session().update_with_real_data(result);
            ApiResponse::ok(load(ctx))
        }
        Err(e) => ApiResponse::err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::analysis::DataSource;
    use crate::logic::config::ServiceConfig;
    use crate::logic::session::MemorySessionStore;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(uri: &str) -> AppContext {
        AppContext::with_store(ServiceConfig::for_backend(uri), MemorySessionStore::new()).unwrap()
    }

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        server
    }

    fn results(total: usize, fraud: usize) -> serde_json::Value {
        let predictions: Vec<_> = (0..total)
            .map(|i| {
                json!({
                    "is_fraud": i < fraud,
                    "fraud_probability": if i < fraud { 0.9 } else { 0.1 },
                    "risk_score": if i < fraud { 0.9 } else { 0.1 },
                    "confidence": 0.8
                })
            })
            .collect();
        json!({
            "predictions": predictions,
            "model_metrics": {"accuracy": 0.9, "precision": 0.3, "recall": 0.8, "f1_score": 0.4, "roc_auc": 0.93},
            "processing_time": 0.2,
            "total_records": total,
            "fraud_count": fraud
        })
    }

    #[test]
    fn test_fresh_view_is_mock() {
        let ctx = context("http://localhost:8000");
        let view = load(&ctx);
        assert_eq!(view.info.data_source, DataSource::Mock);
        assert_eq!(view.info.total_records, 25);
        assert_eq!(view.data.predictions.len(), 25);
        assert!(!is_showing_real_data(&ctx));
    }

    #[test]
    fn test_session_commands_return_refreshed_view() {
        let ctx = context("http://localhost:8000");

        let mut real = load(&ctx).data;
        real.total_records = 100;
        real.fraud_count = 12;
        let view = update_with_real_data(&ctx, real);
        assert_eq!(view.info.data_source, DataSource::Real);
        assert_eq!(view.info.total_records, 100);
        assert_eq!(view.info.fraud_count, 12);

        // Refresh touches mock data only
        let view = refresh_mock_data(&ctx);
        assert_eq!(view.info.data_source, DataSource::Real);

        let view = reset_to_mock_data(&ctx);
        assert_eq!(view.info.data_source, DataSource::Mock);
        assert!(!view.info.has_uploaded_data);

        update_with_real_data(&ctx, load(&ctx).data);
        let view = clear_session(&ctx);
        assert_eq!(view.info.data_source, DataSource::Mock);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let ctx = context("http://localhost:8000");
        let value = serde_json::to_value(load(&ctx)).unwrap();
        assert_eq!(value["info"]["dataSource"], json!("mock"));
        assert!(value["data"]["totalRecords"].is_u64());
    }

    #[test]
    fn test_sample_csv_template() {
        let template = sample_csv_template();
        assert!(template.starts_with("customer_age,income,"));
        assert!(template.ends_with("device_fraud_count,month\n"));
        assert_eq!(template.trim_end().split(',').count(), CSV_COLUMNS.len());
    }

    #[tokio::test]
    async fn test_upload_file_switches_to_real_data() {
        let server = healthy_server().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": results(4, 1)})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rows.csv");
        std::fs::write(&file, sample_csv_template()).unwrap();

        // Health check was never run, the upload reconnects first
        let ctx = context(&server.uri());
        let view = upload_file(&ctx, &file, None).await.into_result().unwrap();

        assert_eq!(view.info.data_source, DataSource::Real);
        assert_eq!(view.info.total_records, 4);
        assert_eq!(view.info.fraud_count, 1);
        assert!(is_showing_real_data(&ctx));
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_session() {
        let server = healthy_server().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad columns"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rows.csv");
        std::fs::write(&file, "x\n1\n").unwrap();

        let ctx = context(&server.uri());
        let response = upload_file(&ctx, &file, None).await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("422"));
        assert!(!is_showing_real_data(&ctx));
    }

    #[tokio::test]
    async fn test_analyze_records_switches_to_real_data() {
        let server = healthy_server().await;
        Mock::given(method("POST"))
            .and(path("/predict/batch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(results(2, 2)))
            .mount(&server)
            .await;

        let ctx = context(&server.uri());
        let records = vec![TransactionRecord::default(), TransactionRecord::default()];
        let view = analyze_records(&ctx, &records).await.into_result().unwrap();

        assert_eq!(view.info.fraud_count, 2);
        assert_eq!(view.data.predictions.len(), 2);
    }

    #[tokio::test]
    async fn test_explain_prediction_cleans_text() {
        let server = healthy_server().await;
        let ctx = context(&server.uri());
        let age = load(&ctx).data.predictions[3].original_data.customer_age;

        Mock::given(method("POST"))
            .and(path("/explain"))
            .and(body_partial_json(json!({
                "transaction_data": {"customer_age": age},
                "prediction": {"explanation": ""}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "explanation": "**Elevated risk.** Velocity is unusual.",
                "processing_time": 0.9
            })))
            .expect(1)
            .mount(&server)
            .await;

        let explanation = explain_prediction(&ctx, 3).await.into_result().unwrap();
        assert_eq!(explanation.explanation, "Elevated risk.\n\nVelocity is unusual.");
        assert_eq!(explanation.processing_time, 0.9);
    }

    #[tokio::test]
    async fn test_explain_prediction_out_of_range() {
        let ctx = context("http://localhost:8000");
        let response = explain_prediction(&ctx, 99).await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("No transaction at index 99"));
    }

    #[tokio::test]
    async fn test_explain_prediction_backend_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let ctx = context(&server.uri());
        let response = explain_prediction(&ctx, 0).await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Backend is not available"));
    }
}

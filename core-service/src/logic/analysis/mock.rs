//! Mock Analysis Generator
//!
//! Synthetic dataset shown before the user uploads anything. Shape is fixed,
//! values are random. Not meant to model the real data distribution.

use rand::Rng;

use super::types::{
    feature_importance, AnalysisResult, PredictionRecord, TopFeature, TransactionRecord, DEFAULT_MODEL_METRICS,
};
use crate::constants::{MOCK_FRAUD_RATE, MOCK_RECORD_COUNT};

const PAYMENT_TYPES: [&str; 4] = ["AA", "AB", "AC", "AD"];
const EMPLOYMENT_STATUSES: [&str; 4] = ["CA", "CB", "CC", "CD"];
const HOUSING_STATUSES: [&str; 4] = ["BA", "BB", "BC", "BD"];
const SOURCES: [&str; 4] = ["INTERNET", "MOBILE", "BRANCH", "ATM"];
const DEVICE_OSES: [&str; 5] = ["windows", "mac", "linux", "android", "ios"];

/// Processing time reported for mock runs (seconds)
const MOCK_PROCESSING_TIME: f64 = 0.045;

/// Generate a fresh mock dataset using the thread-local RNG
pub fn generate_mock_analysis() -> AnalysisResult {
    generate_mock_analysis_with(&mut rand::thread_rng())
}

/// Generate a mock dataset from the given RNG
pub fn generate_mock_analysis_with<R: Rng + ?Sized>(rng: &mut R) -> AnalysisResult {
    let predictions: Vec<PredictionRecord> = (0..MOCK_RECORD_COUNT)
        .map(|_| mock_prediction(rng))
        .collect();

    let fraud_count = predictions.iter().filter(|p| p.is_fraud).count();

    AnalysisResult {
        predictions,
        model_metrics: DEFAULT_MODEL_METRICS,
        processing_time: MOCK_PROCESSING_TIME,
        total_records: MOCK_RECORD_COUNT,
        fraud_count,
    }
}

fn mock_prediction<R: Rng + ?Sized>(rng: &mut R) -> PredictionRecord {
    let is_fraud = rng.gen_bool(MOCK_FRAUD_RATE);
    let risk_score = if is_fraud {
        rng.gen_range(0.6..1.0)
    } else {
        rng.gen_range(0.0..0.4)
    };
    let confidence = rng.gen_range(0.7..1.0);

    let record = mock_transaction(rng, is_fraud);
    let top_features = [
        ("velocity_6h", record.velocity_6h),
        ("device_fraud_count", record.device_fraud_count as f64),
        ("credit_risk_score", record.credit_risk_score as f64),
        ("session_length_in_minutes", record.session_length_in_minutes),
        ("bank_months_count", record.bank_months_count as f64),
    ]
    .into_iter()
    .map(|(name, value)| TopFeature::new(name, feature_importance(name), value))
    .collect();

    PredictionRecord {
        is_fraud,
        fraud_probability: risk_score,
        risk_score,
        confidence,
        explanation: mock_explanation(&record, is_fraud),
        top_features,
        original_data: record,
    }
}

fn mock_transaction<R: Rng + ?Sized>(rng: &mut R, is_fraud: bool) -> TransactionRecord {
    TransactionRecord {
        customer_age: rng.gen_range(25..75),
        income: rng.gen(),
        name_email_similarity: rng.gen(),
        prev_address_months_count: rng.gen_range(-1..59),
        current_address_months_count: rng.gen_range(0..120),
        days_since_request: rng.gen_range(0.0..30.0),
        intended_balcon_amount: rng.gen_range(0.0..10_000.0),
        proposed_credit_limit: rng.gen_range(1_000.0..6_000.0),
        payment_type: pick(rng, &PAYMENT_TYPES),
        bank_months_count: rng.gen_range(-1..59),
        has_other_cards: flag(rng, 0.5),
        foreign_request: flag(rng, 0.2),
        velocity_6h: rng.gen_range(0.0..10_000.0),
        velocity_24h: rng.gen_range(0.0..20_000.0),
        velocity_4w: rng.gen_range(0.0..50_000.0),
        zip_count_4w: rng.gen_range(0..10),
        bank_branch_count_8w: rng.gen_range(0..20),
        date_of_birth_distinct_emails_4w: rng.gen_range(0..5),
        credit_risk_score: rng.gen_range(0..300),
        employment_status: pick(rng, &EMPLOYMENT_STATUSES),
        housing_status: pick(rng, &HOUSING_STATUSES),
        email_is_free: flag(rng, 0.4),
        phone_home_valid: flag(rng, 0.9),
        phone_mobile_valid: flag(rng, 0.95),
        source: pick(rng, &SOURCES),
        session_length_in_minutes: rng.gen_range(0.0..60.0),
        device_os: pick(rng, &DEVICE_OSES),
        keep_alive_session: flag(rng, 0.7),
        device_distinct_emails_8w: rng.gen_range(0..10),
        device_fraud_count: if is_fraud { rng.gen_range(0..3) } else { 0 },
        month: rng.gen_range(0..12),
        fraud_bool: Some(u8::from(is_fraud)),
    }
}

fn mock_explanation(record: &TransactionRecord, is_fraud: bool) -> String {
    if is_fraud {
        format!(
            "High risk transaction detected. Key factors: unusually high transaction velocity ({:.1}), \
             device has previous fraud history ({} cases), low credit risk score ({}).",
            record.velocity_6h, record.device_fraud_count, record.credit_risk_score
        )
    } else {
        format!(
            "Low risk transaction. Normal customer patterns and transaction characteristics detected. \
             Customer age: {}, credit score: {}, velocity within normal range.",
            record.customer_age, record.credit_risk_score
        )
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&str]) -> String {
    options[rng.gen_range(0..options.len())].to_string()
}

/// 1 with probability `p`, else 0
fn flag<R: Rng + ?Sized>(rng: &mut R, p: f64) -> u8 {
    u8::from(rng.gen_bool(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mock_dataset_shape() {
        let result = generate_mock_analysis();
        assert_eq!(result.total_records, 25);
        assert_eq!(result.predictions.len(), 25);
        assert_eq!(result.model_metrics, DEFAULT_MODEL_METRICS);
        assert_eq!(result.processing_time, 0.045);
    }

    #[test]
    fn test_fraud_count_matches_predictions() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = generate_mock_analysis_with(&mut rng);
            assert!(result.is_consistent(), "seed {} produced inconsistent counts", seed);
            assert!(result.fraud_count <= result.total_records);
        }
    }

    #[test]
    fn test_risk_bands_follow_label() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            for p in generate_mock_analysis_with(&mut rng).predictions {
                if p.is_fraud {
                    assert!((0.6..1.0).contains(&p.risk_score));
                    assert_eq!(p.original_data.fraud_bool, Some(1));
                } else {
                    assert!((0.0..0.4).contains(&p.risk_score));
                    assert_eq!(p.original_data.device_fraud_count, 0);
                }
                assert_eq!(p.fraud_probability, p.risk_score);
                assert!((0.7..1.0).contains(&p.confidence));
            }
        }
    }

    #[test]
    fn test_top_features_are_fixed() {
        let result = generate_mock_analysis_with(&mut StdRng::seed_from_u64(1));
        let first = &result.predictions[0];
        let names: Vec<&str> = first.top_features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "velocity_6h",
                "device_fraud_count",
                "credit_risk_score",
                "session_length_in_minutes",
                "bank_months_count"
            ]
        );
        assert_eq!(first.top_features[0].value, first.original_data.velocity_6h);
        assert_eq!(first.top_features[0].importance, 0.18);
        assert_eq!(first.top_features[4].importance, 0.08);
    }

    #[test]
    fn test_explanation_matches_label() {
        let result = generate_mock_analysis_with(&mut StdRng::seed_from_u64(3));
        for p in &result.predictions {
            if p.is_fraud {
                assert!(p.explanation.starts_with("High risk"));
            } else {
                assert!(p.explanation.starts_with("Low risk"));
            }
        }
    }
}

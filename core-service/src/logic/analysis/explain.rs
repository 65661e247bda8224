//! Explanation helpers
//!
//! Input fallback for predictions that lost their source row, and cleanup of
//! the markdown the backend's language model returns.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{PredictionRecord, TransactionRecord};

/// Rewrite rules applied in order by `clean_explanation`
const CLEANUP_PATTERNS: [(&str, &str); 11] = [
    (r"\*\*(.*?)\*\*", "$1"),                              // bold
    (r"\*(.*?)\*", "$1"),                                  // italic
    (r"`(.*?)`", "$1"),                                    // inline code
    (r"#{1,6}\s*", ""),                                    // headers
    (r"\[(.*?)\]\(.*?\)", "$1"),                           // links
    (r"Transaction Risk Assessment: TXN-\d+\s*", ""),
    (r"Transaction Risk Assessment:\s*", ""),
    (r"\n{3,}", "\n\n"),
    (r"\s(\d+\.\s)", "\n$1"),                              // numbered points on their own line
    (r"([a-z)][.!?])\s+([A-Z])", "$1\n\n$2"),              // paragraph per sentence
    (r"\n\s*\n\s*\n", "\n\n"),
];

static CLEANUP_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CLEANUP_PATTERNS
        .iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(re) => Some((re, *replacement)),
            Err(e) => {
                log::error!("Invalid explanation cleanup pattern {:?}: {}", pattern, e);
                None
            }
        })
        .collect()
});

/// Strip markdown and lay the text out one sentence per paragraph
pub fn clean_explanation(raw: &str) -> String {
    let mut text = raw.to_string();
    for (re, replacement) in CLEANUP_RULES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text.trim().to_string()
}

/// Row to send to `/explain`. Predictions that came back from an upload carry
/// no source row, so a typical applicant is synthesized, seeded with the
/// prediction's own top-feature values.
pub fn explanation_input(prediction: &PredictionRecord) -> TransactionRecord {
    if prediction.original_data != TransactionRecord::default() {
        return prediction.original_data.clone();
    }

    log::debug!("Prediction has no source row, synthesizing one for explanation");

    let feature = |name: &str, fallback: f64| {
        prediction
            .top_features
            .iter()
            .find(|f| f.feature == name)
            .map(|f| f.value)
            .filter(|v| *v != 0.0)
            .unwrap_or(fallback)
    };

    TransactionRecord {
        customer_age: 35,
        income: 0.8,
        name_email_similarity: 0.5,
        prev_address_months_count: 12,
        current_address_months_count: 24,
        days_since_request: 0.0,
        intended_balcon_amount: 1000.0,
        proposed_credit_limit: 2000.0,
        payment_type: "AA".to_string(),
        bank_months_count: 12,
        has_other_cards: 1,
        foreign_request: 0,
        velocity_6h: feature("velocity_6h", 5000.0),
        velocity_24h: 10000.0,
        velocity_4w: 50000.0,
        zip_count_4w: 1,
        bank_branch_count_8w: 1,
        date_of_birth_distinct_emails_4w: 1,
        credit_risk_score: feature("credit_risk_score", 150.0) as i64,
        employment_status: "CA".to_string(),
        housing_status: "BA".to_string(),
        email_is_free: 0,
        phone_home_valid: 1,
        phone_mobile_valid: 1,
        source: "INTERNET".to_string(),
        session_length_in_minutes: feature("session_length_in_minutes", 5.0),
        device_os: "windows".to_string(),
        keep_alive_session: 1,
        device_distinct_emails_8w: 1,
        device_fraud_count: feature("device_fraud_count", 0.0) as u32,
        month: 0,
        fraud_bool: Some(u8::from(prediction.is_fraud)),
    }
}

use super::storage::{FileSessionStore, MemorySessionStore, SessionStore, StorageError};
use super::{SessionData, SessionService};
use crate::logic::analysis::{AnalysisResult, DataSource, ModelMetrics, PredictionRecord};

/// Store whose writes always fail (quota exceeded, read-only disk, ...)
struct BrokenStore;

impl SessionStore for BrokenStore {
    fn load(&self) -> Result<Option<SessionData>, StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )))
    }

    fn save(&self, _data: &SessionData) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }

    fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

fn real_result(total: usize, fraud: usize) -> AnalysisResult {
    let predictions = (0..total)
        .map(|i| PredictionRecord {
            is_fraud: i < fraud,
            fraud_probability: if i < fraud { 0.9 } else { 0.1 },
            risk_score: if i < fraud { 0.9 } else { 0.1 },
            confidence: 0.8,
            explanation: String::new(),
            top_features: Vec::new(),
            original_data: Default::default(),
        })
        .collect();

    AnalysisResult {
        predictions,
        model_metrics: ModelMetrics::default(),
        processing_time: 1.25,
        total_records: total,
        fraud_count: fraud,
    }
}

#[test]
fn test_fresh_session_shows_mock_data() {
    let service = SessionService::in_memory();
    let info = service.get_session_info();

    assert_eq!(info.data_source, DataSource::Mock);
    assert_eq!(info.total_records, 25);
    assert!(!info.has_uploaded_data);
    assert!(!service.is_showing_real_data());
    assert!(service.get_current_data().is_consistent());
}

#[test]
fn test_update_with_real_data_switches_source() {
    let service = SessionService::in_memory();
    service.update_with_real_data(real_result(100, 12));

    let info = service.get_session_info();
    assert_eq!(info.data_source, DataSource::Real);
    assert_eq!(info.total_records, 100);
    assert_eq!(info.fraud_count, 12);
    assert!(info.has_uploaded_data);
    assert_eq!(service.get_current_data().total_records, 100);
}

#[test]
fn test_selector_requires_flag_and_data() {
    let mut data = SessionData::fresh();

    // Flag without data falls back to mock
    data.has_uploaded_data = true;
    assert_eq!(data.current(), &data.mock_data);
    assert_eq!(data.info().data_source, DataSource::Mock);

    // Data without flag falls back to mock
    data.has_uploaded_data = false;
    data.real_data = Some(real_result(3, 1));
    assert_eq!(data.current(), &data.mock_data);

    data.has_uploaded_data = true;
    assert_eq!(data.current().total_records, 3);
}

#[test]
fn test_reset_to_mock_data_drops_real_data() {
    let service = SessionService::in_memory();
    service.update_with_real_data(real_result(10, 2));
    let before = service.snapshot().mock_data;

    service.reset_to_mock_data();

    let state = service.snapshot();
    assert!(!state.has_uploaded_data);
    assert!(state.real_data.is_none());
    assert_ne!(state.mock_data, before);
    assert_eq!(service.get_session_info().data_source, DataSource::Mock);
}

#[test]
fn test_refresh_mock_data_keeps_real_data() {
    let service = SessionService::in_memory();
    service.update_with_real_data(real_result(10, 2));
    let before = service.snapshot();

    service.refresh_mock_data();

    let after = service.snapshot();
    assert_eq!(after.real_data, before.real_data);
    assert!(after.has_uploaded_data);
    assert_ne!(after.mock_data, before.mock_data);
    assert!(after.last_updated >= before.last_updated);
}

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let service = SessionService::new(Box::new(FileSessionStore::new(&path)));
        service.update_with_real_data(real_result(40, 5));
    }

    let restored = SessionService::new(Box::new(FileSessionStore::new(&path)));
    let info = restored.get_session_info();
    assert_eq!(info.data_source, DataSource::Real);
    assert_eq!(info.total_records, 40);
    assert_eq!(info.fraud_count, 5);
}

#[test]
fn test_missing_mock_data_is_regenerated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        r#"{"hasUploadedData": false, "realData": null, "lastUpdated": "2024-05-01T10:00:00.000Z"}"#,
    )
    .unwrap();

    let service = SessionService::new(Box::new(FileSessionStore::new(&path)));
    let state = service.snapshot();
    assert_eq!(state.mock_data.total_records, 25);
    assert_eq!(service.get_session_info().last_updated, "2024-05-01T10:00:00.000Z");
}

#[test]
fn test_corrupt_session_falls_back_to_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "][").unwrap();

    let service = SessionService::new(Box::new(FileSessionStore::new(&path)));
    assert_eq!(service.get_session_info().data_source, DataSource::Mock);
    assert_eq!(service.get_session_info().total_records, 25);
}

#[test]
fn test_storage_failures_degrade_to_memory() {
    let service = SessionService::new(Box::new(BrokenStore));

    service.update_with_real_data(real_result(7, 1));
    assert_eq!(service.get_session_info().total_records, 7);

    service.clear_session();
    assert_eq!(service.get_session_info().data_source, DataSource::Mock);
}

#[test]
fn test_clear_session_persists_fresh_state() {
    let store = std::sync::Arc::new(MemorySessionStore::new());
    let service = SessionService::new(Box::new(store.clone()));

    service.update_with_real_data(real_result(5, 1));
    assert!(store.load().unwrap().unwrap().has_uploaded_data);

    service.clear_session();
    assert!(!service.is_showing_real_data());

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored, service.snapshot());
    assert!(stored.real_data.is_none());
}

#[test]
fn test_clear_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let service = SessionService::new(Box::new(FileSessionStore::new(&path)));
    service.update_with_real_data(real_result(9, 2));
    service.clear_session();
    let before = service.get_current_data();

    let reopened = SessionService::new(Box::new(FileSessionStore::new(&path)));
    assert_eq!(reopened.get_session_info().data_source, DataSource::Mock);
    assert_eq!(reopened.get_current_data(), before);
}

#[test]
fn test_persisted_json_uses_camel_case() {
    let json = serde_json::to_value(SessionData::fresh()).unwrap();
    assert!(json.get("hasUploadedData").is_some());
    assert!(json.get("mockData").is_some());
    assert!(json["realData"].is_null());
    assert!(json["mockData"].get("modelMetrics").is_some());
    assert!(json["mockData"]["predictions"][0].get("originalData").is_some());
    assert!(json["mockData"]["predictions"][0]["originalData"].get("velocity_6h").is_some());
}

use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::checkins::CheckInService;
use crate::config::TableNames;
pub(super) use crate::test_support::{object, MemoryStore};

pub(super) fn tables() -> TableNames {
    TableNames::default()
}

pub(super) fn build_service() -> (CheckInService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = CheckInService::new(store.clone(), tables());
    (service, store)
}

pub(super) fn reference_payload() -> Value {
    json!({
        "userId": 42,
        "mood": 7,
        "energy": 6,
        "stress": 3,
        "sleepQuality": 6,
        "sleepHours": 7.5,
        "exerciseHours": 0.5,
        "timeOutsideMin": 25,
        "workingHrs": 8,
        "connectwithfamily": true,
        "notes": "walked to work",
        "created_timestamp": "2025-09-06T18:00:00Z",
    })
}

pub(super) fn band_rows() -> Vec<Value> {
    vec![
        json!({
            "band_key": "thriving",
            "label": "Thriving",
            "min_score": 7,
            "max_score": 10,
            "display_order": 3,
            "message": "Great day!",
            "tips": "[\"Share the good energy\", \"Keep your routine\"]",
        }),
        json!({
            "band_key": "low",
            "label": "Low",
            "min_score": 0,
            "max_score": 4,
            "inclusive_max": false,
            "display_order": 1,
            "crisis_note": "Reach out if you need support",
            "tips": "Rest and hydrate",
        }),
        json!({
            "band_key": "steady",
            "label": "Steady",
            "min_score": 4,
            "max_score": 7,
            "inclusive_max": false,
            "display_order": 2,
            "tips": [],
        }),
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}

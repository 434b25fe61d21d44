use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::event_models::{EventSummary, IncomingEvent, StoredEvent, KNOWN_EVENT_TYPES};
use crate::AppState;

fn validate_event(incoming: IncomingEvent) -> Result<StoredEvent, AppError> {
    if !KNOWN_EVENT_TYPES.contains(&incoming.kind.as_str()) {
        return Err(AppError::Validation(format!("unknown event type {:?}", incoming.kind)));
    }
    if incoming.session_id.trim().is_empty() || incoming.user_id.trim().is_empty() {
        return Err(AppError::Validation("sessionId and userId are required".to_string()));
    }
    let timestamp = DateTime::parse_from_rfc3339(&incoming.timestamp)
        .map_err(|_| AppError::Validation(format!("timestamp {:?} is not RFC 3339", incoming.timestamp)))?
        .with_timezone(&Utc);

    Ok(StoredEvent {
        kind: incoming.kind,
        session_id: incoming.session_id,
        user_id: incoming.user_id,
        timestamp,
        received_at: Utc::now(),
        url: incoming.url,
        properties: incoming.properties,
    })
}

pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let incoming: IncomingEvent = serde_json::from_value(body)?;
    let event = validate_event(incoming)?;

    if event.kind == "conversion" {
        info!(
            session_id = %event.session_id,
            conversion = ?event.properties.get("conversion_type"),
            "Conversion recorded"
        );
    } else {
        debug!(kind = %event.kind, session_id = %event.session_id, "Event recorded");
    }

    state.events.record(event).await;
    Ok(StatusCode::ACCEPTED)
}

pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<EventSummary> {
    Json(state.events.summary().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analytics/events")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_event() -> Value {
        json!({
            "type": "cta_click",
            "sessionId": "session_abc",
            "userId": "user_xyz",
            "timestamp": "2026-10-19T10:00:00.000Z",
            "url": "https://clinic.test/",
            "label": "Book an appointment",
        })
    }

    #[tokio::test]
    async fn accepts_and_counts_valid_events() {
        let state = Arc::new(AppState::new(AppConfig::default()));
        let app = crate::app(state.clone());

        let response = app.clone().oneshot(post(valid_event())).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/analytics/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let summary: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(summary["total"], json!(1));
        assert_eq!(summary["sessions"], json!(1));
        assert_eq!(summary["by_type"]["cta_click"], json!(1));
    }

    #[tokio::test]
    async fn keeps_flat_properties() {
        let stored = validate_event(serde_json::from_value(valid_event()).unwrap()).unwrap();
        assert_eq!(stored.properties.get("label"), Some(&json!("Book an appointment")));
        assert!(stored.properties.get("sessionId").is_none());
    }

    #[tokio::test]
    async fn rejects_unknown_type_and_bad_timestamp() {
        let app = crate::app(Arc::new(AppState::new(AppConfig::default())));

        let mut unknown = valid_event();
        unknown["type"] = json!("mystery");
        let response = app.clone().oneshot(post(unknown)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut stale = valid_event();
        stale["timestamp"] = json!("yesterday");
        let response = app.clone().oneshot(post(stale)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut anonymous = valid_event();
        anonymous["sessionId"] = json!("");
        let response = app.oneshot(post(anonymous)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], json!("sessionId and userId are required"));
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let app = crate::app(Arc::new(AppState::new(AppConfig::default())));
        let response = app.oneshot(post(json!({ "type": "page_view" }))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use axum::Json;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::AppError;
use crate::models::contact_models::{ContactRequest, ContactResponse};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

fn validate_contact(req: &ContactRequest) -> Result<(), AppError> {
    let required = [
        ("name", &req.name),
        ("email", &req.email),
        ("phone", &req.phone),
        ("service", &req.service),
        ("preferred_date", &req.preferred_date),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!("missing required fields: {}", missing.join(", "))));
    }
    if !EMAIL_PATTERN.is_match(req.email.trim()) {
        return Err(AppError::Validation("email is not a valid address".to_string()));
    }
    Ok(())
}

pub async fn submit_contact(Json(req): Json<ContactRequest>) -> Result<Json<ContactResponse>, AppError> {
    validate_contact(&req)?;

    info!(
        service = %req.service,
        preferred_date = %req.preferred_date,
        new_patient = req.new_patient,
        "Appointment request received"
    );

    Ok(Json(ContactResponse {
        message: format!("Thanks {}, we will call you to confirm your {} visit.", req.name.trim(), req.service),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            service: "cleaning".to_string(),
            preferred_date: "2026-11-02".to_string(),
            preferred_time: String::new(),
            message: String::new(),
            new_patient: true,
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(validate_contact(&request()).is_ok());
    }

    #[test]
    fn lists_missing_fields() {
        let mut req = request();
        req.phone = " ".to_string();
        req.service.clear();
        let err = validate_contact(&req).unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: phone, service");
    }

    #[test]
    fn rejects_malformed_email() {
        let mut req = request();
        req.email = "ada.example.com".to_string();
        assert!(validate_contact(&req).is_err());
    }

    #[tokio::test]
    async fn responds_with_confirmation() {
        let Json(response) = submit_contact(Json(request())).await.unwrap();
        assert!(response.message.contains("cleaning"));
    }
}

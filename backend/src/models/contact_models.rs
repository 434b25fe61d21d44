use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub preferred_date: String,
    #[serde(default)]
    pub preferred_time: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub new_patient: bool,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub message: String,
}

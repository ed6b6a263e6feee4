use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Greeting {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusCheck {
    pub id: Uuid,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusCheck {
    /// New record with a server-assigned id and creation time.
    pub fn new(client_name: String) -> Self {
        Self { id: Uuid::new_v4(), client_name, timestamp: Utc::now() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationRequest {
    pub prompt: String, // may be empty, forwarded as-is
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationResponse {
    pub code: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub detail: String,
}

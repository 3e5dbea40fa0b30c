use serde::{Deserialize, Serialize};

/// Endpoints and identity the host transport needs to bring a session up.
/// The ticket itself is fetched by the host; this only knows where from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_address: String,
    pub ticket_endpoint: String,
    pub server_id: String,
    pub username: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: "ws://127.0.0.1:2480".to_owned(),
            ticket_endpoint: "http://127.0.0.1:1984".to_owned(),
            server_id: "default".to_owned(),
            username: "guest".to_owned(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// URL the host fetches the login ticket from.
    pub fn ticket_url(&self) -> String {
        format!(
            "{}/login/{}/{}",
            self.ticket_endpoint, self.server_id, self.username
        )
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::Credentials;
use shared_upstream::{UpstreamClient, UpstreamError};

use crate::models::AppointmentSearch;
use crate::provider::{Appointment, BookingSession, BookingSessionProvider, ProviderError};

impl From<UpstreamError> for ProviderError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unauthorized(_) => ProviderError::InvalidCredentials,
            UpstreamError::Status { status, .. } => ProviderError::Upstream {
                status: status.as_u16(),
            },
            UpstreamError::Transport(e) => ProviderError::Transport(e.to_string()),
            UpstreamError::Decode(e) => ProviderError::Decode(e.to_string()),
            UpstreamError::InvalidToken => {
                ProviderError::Decode("session token is not a valid header value".to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    session: String,
}

/// Booking provider reached through a JSON gateway.
pub struct RemoteBookingProvider {
    client: UpstreamClient,
}

impl RemoteBookingProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: UpstreamClient::new(config),
        }
    }
}

#[async_trait]
impl BookingSessionProvider for RemoteBookingProvider {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn BookingSession>, ProviderError> {
        let request = LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        };

        let response: LoginResponse = self.client.post("/login", None, &request).await?;
        debug!("Booking provider session opened for {}", credentials.username);

        Ok(Box::new(RemoteSession {
            client: self.client.clone(),
            token: response.session,
        }))
    }
}

struct RemoteSession {
    client: UpstreamClient,
    token: String,
}

#[async_trait]
impl BookingSession for RemoteSession {
    async fn list_regions(&self) -> Result<Value, ProviderError> {
        let no_query: [(&str, &str); 0] = [];
        Ok(self.client.get("/regions", &self.token, &no_query).await?)
    }

    async fn list_specializations(
        &self,
        region: &str,
        bookingtype: i32,
    ) -> Result<Value, ProviderError> {
        let bookingtype = bookingtype.to_string();
        let query = [("region", region), ("bookingtype", bookingtype.as_str())];

        Ok(self.client.get("/specializations", &self.token, &query).await?)
    }

    async fn list_clinics(
        &self,
        region: &str,
        bookingtype: i32,
        specialization: &str,
    ) -> Result<Value, ProviderError> {
        let bookingtype = bookingtype.to_string();
        let query = [
            ("region", region),
            ("bookingtype", bookingtype.as_str()),
            ("specialization", specialization),
        ];

        Ok(self.client.get("/clinics", &self.token, &query).await?)
    }

    async fn list_doctors(
        &self,
        region: &str,
        bookingtype: i32,
        specialization: &str,
        clinic: &str,
    ) -> Result<Value, ProviderError> {
        let bookingtype = bookingtype.to_string();
        let query = [
            ("region", region),
            ("bookingtype", bookingtype.as_str()),
            ("specialization", specialization),
            ("clinic", clinic),
        ];

        Ok(self.client.get("/doctors", &self.token, &query).await?)
    }

    async fn search_appointments(
        &self,
        search: &AppointmentSearch,
    ) -> Result<Vec<Appointment>, ProviderError> {
        let found: Option<Vec<Appointment>> = self
            .client
            .post("/appointments/search", Some(self.token.as_str()), search)
            .await?;

        Ok(found.unwrap_or_default())
    }
}

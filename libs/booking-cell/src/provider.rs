use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use shared_models::auth::Credentials;
use shared_models::error::AppError;

use crate::models::AppointmentSearch;

/// Provider-side filter sent with every domain query.
pub const BOOKING_TYPE: i32 = 2;

/// One bookable slot, exactly as the provider describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Appointment(pub Map<String, Value>);

impl Appointment {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Appointment {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Booking provider rejected the credentials")]
    InvalidCredentials,

    #[error("Booking provider unreachable: {0}")]
    Transport(String),

    #[error("Booking provider returned an unexpected payload: {0}")]
    Decode(String),

    #[error("Booking provider responded with status {status}")]
    Upstream { status: u16 },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidCredentials => {
                AppError::UpstreamAuth("Booking provider rejected the credentials".to_string())
            }
            other => {
                error!("Booking provider call failed: {}", other);
                AppError::ExternalService("Booking provider request failed".to_string())
            }
        }
    }
}

/// Logs in to the booking backend.
///
/// Each call yields a fresh session owned by the caller; implementations must
/// not hand out shared or cached sessions.
#[async_trait]
pub trait BookingSessionProvider: Send + Sync {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn BookingSession>, ProviderError>;
}

/// An authenticated session. Every method performs exactly one attempt.
#[async_trait]
pub trait BookingSession: Send + Sync {
    async fn list_regions(&self) -> Result<Value, ProviderError>;

    async fn list_specializations(
        &self,
        region: &str,
        bookingtype: i32,
    ) -> Result<Value, ProviderError>;

    async fn list_clinics(
        &self,
        region: &str,
        bookingtype: i32,
        specialization: &str,
    ) -> Result<Value, ProviderError>;

    async fn list_doctors(
        &self,
        region: &str,
        bookingtype: i32,
        specialization: &str,
        clinic: &str,
    ) -> Result<Value, ProviderError>;

    /// An empty vector means no free slots, which is not an error.
    async fn search_appointments(
        &self,
        search: &AppointmentSearch,
    ) -> Result<Vec<Appointment>, ProviderError>;
}

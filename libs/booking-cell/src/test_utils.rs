use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use shared_models::auth::Credentials;

use crate::models::AppointmentSearch;
use crate::provider::{Appointment, BookingSession, BookingSessionProvider, ProviderError};

/// Provider call as seen by [`StubBookingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Regions,
    Specializations { region: String, bookingtype: i32 },
    Clinics { region: String, bookingtype: i32, specialization: String },
    Doctors { region: String, bookingtype: i32, specialization: String, clinic: String },
    Search(AppointmentSearch),
}

#[derive(Default)]
struct StubInner {
    logins: AtomicUsize,
    queries: AtomicUsize,
    last_credentials: Mutex<Option<Credentials>>,
    calls: Mutex<Vec<ProviderCall>>,
}

/// In-memory provider that counts and records every call.
#[derive(Clone)]
pub struct StubBookingProvider {
    inner: Arc<StubInner>,
    listing: Value,
    appointments: Vec<Appointment>,
    login_error: Option<ProviderError>,
    query_error: Option<ProviderError>,
    login_delay: Option<Duration>,
}

impl Default for StubBookingProvider {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            listing: json!([]),
            appointments: Vec::new(),
            login_error: None,
            query_error: None,
            login_delay: None,
        }
    }
}

impl StubBookingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned by every list_* call.
    pub fn with_listing(mut self, listing: Value) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_appointments(mut self, appointments: Vec<Appointment>) -> Self {
        self.appointments = appointments;
        self
    }

    pub fn rejecting_logins(mut self) -> Self {
        self.login_error = Some(ProviderError::InvalidCredentials);
        self
    }

    pub fn failing_logins(mut self, err: ProviderError) -> Self {
        self.login_error = Some(err);
        self
    }

    pub fn failing_queries(mut self, err: ProviderError) -> Self {
        self.query_error = Some(err);
        self
    }

    /// Makes every login wait before answering, like a slow backend.
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = Some(delay);
        self
    }

    pub fn login_count(&self) -> usize {
        self.inner.logins.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    /// Logins plus domain queries.
    pub fn call_count(&self) -> usize {
        self.login_count() + self.query_count()
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.inner.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn last_credentials(&self) -> Option<Credentials> {
        self.inner
            .last_credentials
            .lock()
            .ok()
            .and_then(|credentials| credentials.clone())
    }

    fn record(&self, call: ProviderCall) -> Result<(), ProviderError> {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.inner.calls.lock() {
            calls.push(call);
        }
        match &self.query_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingSessionProvider for StubBookingProvider {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn BookingSession>, ProviderError> {
        self.inner.logins.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.inner.last_credentials.lock() {
            *last = Some(credentials.clone());
        }

        if let Some(delay) = self.login_delay {
            tokio::time::sleep(delay).await;
        }

        match &self.login_error {
            Some(err) => Err(err.clone()),
            None => Ok(Box::new(self.clone())),
        }
    }
}

#[async_trait]
impl BookingSession for StubBookingProvider {
    async fn list_regions(&self) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Regions)?;
        Ok(self.listing.clone())
    }

    async fn list_specializations(
        &self,
        region: &str,
        bookingtype: i32,
    ) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Specializations {
            region: region.to_string(),
            bookingtype,
        })?;
        Ok(self.listing.clone())
    }

    async fn list_clinics(
        &self,
        region: &str,
        bookingtype: i32,
        specialization: &str,
    ) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Clinics {
            region: region.to_string(),
            bookingtype,
            specialization: specialization.to_string(),
        })?;
        Ok(self.listing.clone())
    }

    async fn list_doctors(
        &self,
        region: &str,
        bookingtype: i32,
        specialization: &str,
        clinic: &str,
    ) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Doctors {
            region: region.to_string(),
            bookingtype,
            specialization: specialization.to_string(),
            clinic: clinic.to_string(),
        })?;
        Ok(self.listing.clone())
    }

    async fn search_appointments(
        &self,
        search: &AppointmentSearch,
    ) -> Result<Vec<Appointment>, ProviderError> {
        self.record(ProviderCall::Search(search.clone()))?;
        Ok(self.appointments.clone())
    }
}

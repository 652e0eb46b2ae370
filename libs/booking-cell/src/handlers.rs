use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;
use tracing::debug;

use shared_models::error::AppError;
use shared_utils::extractor::extract_basic_credentials;

use crate::models::{AppointmentSearch, QueryParams, RouteKind};
use crate::provider::{Appointment, BookingSession, BOOKING_TYPE};
use crate::router::BookingState;

// Logs in with the request's own credentials. Callers validate their query
// parameters first so bad requests never reach the provider.
async fn logged_in_session(
    state: &BookingState,
    headers: &HeaderMap,
) -> Result<Box<dyn BookingSession>, AppError> {
    let credentials = extract_basic_credentials(headers)?;
    debug!("Logging in to booking provider as {}", credentials.username);

    Ok(state.provider.authenticate(&credentials).await?)
}

pub async fn get_regions(
    State(state): State<BookingState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let session = logged_in_session(&state, &headers).await?;

    let regions = session.list_regions().await?;

    Ok(Json(regions))
}

pub async fn get_specializations(
    State(state): State<BookingState>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let [region] = params.require_route(RouteKind::Specializations)?;

    let session = logged_in_session(&state, &headers).await?;
    let specializations = session.list_specializations(region, BOOKING_TYPE).await?;

    Ok(Json(specializations))
}

pub async fn get_clinics(
    State(state): State<BookingState>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let [region, specialization] = params.require_route(RouteKind::Clinics)?;

    let session = logged_in_session(&state, &headers).await?;
    let clinics = session
        .list_clinics(region, BOOKING_TYPE, specialization)
        .await?;

    Ok(Json(clinics))
}

pub async fn get_doctors(
    State(state): State<BookingState>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let [region, specialization, clinic] = params.require_route(RouteKind::Doctors)?;

    let session = logged_in_session(&state, &headers).await?;
    let doctors = session
        .list_doctors(region, BOOKING_TYPE, specialization, clinic)
        .await?;

    Ok(Json(doctors))
}

pub async fn find_appointments(
    State(state): State<BookingState>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let search = AppointmentSearch::from_query(&params, state.today())?;
    debug!("Searching appointments: {:?}", search);

    let session = logged_in_session(&state, &headers).await?;
    let appointments = session.search_appointments(&search).await?;

    debug!("Found {} appointments", appointments.len());
    Ok(Json(appointments))
}

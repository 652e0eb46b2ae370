use std::sync::Arc;

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use chrono::{Local, NaiveDate};

use crate::handlers;
use crate::models::{RouteKind, ROUTES};
use crate::provider::BookingSessionProvider;

/// Per-router dependencies. Holds no request data.
#[derive(Clone)]
pub struct BookingState {
    pub provider: Arc<dyn BookingSessionProvider>,
    clock: fn() -> NaiveDate,
}

impl BookingState {
    pub fn new(provider: Arc<dyn BookingSessionProvider>) -> Self {
        Self {
            provider,
            clock: local_today,
        }
    }

    /// Replaces the source of "today" used as the default search start date.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn route_handler(kind: RouteKind) -> MethodRouter<BookingState> {
    match kind {
        RouteKind::Regions => get(handlers::get_regions),
        RouteKind::Specializations => get(handlers::get_specializations),
        RouteKind::Clinics => get(handlers::get_clinics),
        RouteKind::Doctors => get(handlers::get_doctors),
        RouteKind::Find => get(handlers::find_appointments),
    }
}

pub fn booking_routes(state: BookingState) -> Router {
    ROUTES
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, route_handler(route.kind))
        })
        .with_state(state)
}

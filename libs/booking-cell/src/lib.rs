pub mod handlers;
pub mod models;
pub mod provider;
pub mod router;
pub mod services;
pub mod test_utils;

pub use models::{AppointmentSearch, QueryParams, RouteKind, RouteSpec, ROUTES};
pub use provider::{Appointment, BookingSession, BookingSessionProvider, ProviderError, BOOKING_TYPE};
pub use router::{booking_routes, BookingState};
pub use services::remote::RemoteBookingProvider;

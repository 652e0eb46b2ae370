use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

use crate::provider::BOOKING_TYPE;

pub const NO_FILTER: i64 = -1;
pub const DAY_START: &str = "0:00";
pub const DAY_END: &str = "23:59";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Regions,
    Specializations,
    Clinics,
    Doctors,
    Find,
}

impl RouteKind {
    pub fn spec(self) -> Option<&'static RouteSpec> {
        ROUTES.iter().find(|route| route.kind == self)
    }
}

/// One row of the route table: where a query lives and what it needs.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub path: &'static str,
    /// Checked in this order; the first missing one is reported.
    pub required: &'static [&'static str],
    pub kind: RouteKind,
}

pub const ROUTES: &[RouteSpec] = &[
    RouteSpec {
        path: "/params/regions",
        required: &[],
        kind: RouteKind::Regions,
    },
    RouteSpec {
        path: "/params/specializations",
        required: &["region"],
        kind: RouteKind::Specializations,
    },
    RouteSpec {
        path: "/params/clinics",
        required: &["region", "specialization"],
        kind: RouteKind::Clinics,
    },
    RouteSpec {
        path: "/params/doctors",
        required: &["region", "specialization", "clinic"],
        kind: RouteKind::Doctors,
    },
    RouteSpec {
        path: "/find",
        required: &["region"],
        kind: RouteKind::Find,
    },
];

/// Raw query string values of a single request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self(values)
    }

    /// Present and non-empty value, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.get(name).ok_or_else(|| AppError::missing_param(name))
    }

    /// Values of the route's required parameters, in table order.
    ///
    /// `N` must match the number of required parameters listed for `kind`.
    pub fn require_route<const N: usize>(&self, kind: RouteKind) -> Result<[&str; N], AppError> {
        let route = kind
            .spec()
            .ok_or_else(|| AppError::Internal(format!("{:?} has no route table entry", kind)))?;

        let values = route
            .required
            .iter()
            .map(|name| self.require(name))
            .collect::<Result<Vec<_>, _>>()?;

        values.try_into().map_err(|_| {
            AppError::Internal(format!("{} does not take {} required parameters", route.path, N))
        })
    }

    pub fn int_or(&self, name: &str, default: i64) -> Result<i64, AppError> {
        match self.get(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::ValidationError(format!("{} must be an integer", name))),
            None => Ok(default),
        }
    }

    pub fn date_or(&self, name: &str, default: NaiveDate) -> Result<NaiveDate, AppError> {
        match self.get(name) {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
                AppError::ValidationError(format!("{} must be a date in YYYY-MM-DD format", name))
            }),
            None => Ok(default),
        }
    }
}

/// Full argument set of an appointment search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSearch {
    pub region: String,
    pub bookingtype: i32,
    pub specialization: i64,
    pub clinic: i64,
    pub doctor: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub service: i64,
    pub disable_phone_search: bool,
}

impl AppointmentSearch {
    /// Validates the `/find` query. `today` stands in for a missing start date.
    pub fn from_query(params: &QueryParams, today: NaiveDate) -> Result<Self, AppError> {
        let [region] = params.require_route(RouteKind::Find)?;

        Ok(Self {
            region: region.to_string(),
            bookingtype: BOOKING_TYPE,
            specialization: params.int_or("specialization", NO_FILTER)?,
            clinic: params.int_or("clinic", NO_FILTER)?,
            doctor: params.int_or("doctor", NO_FILTER)?,
            start_date: params.date_or("start_date", today)?,
            end_date: None,
            start_time: DAY_START.to_string(),
            end_time: DAY_END.to_string(),
            service: NO_FILTER,
            disable_phone_search: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_require_route_reports_first_missing_in_order() {
        let err = params(&[("clinic", "7")])
            .require_route::<3>(RouteKind::Doctors)
            .unwrap_err();
        assert_eq!(err.message(), "region is required");

        let err = params(&[("region", "204"), ("clinic", "7")])
            .require_route::<3>(RouteKind::Doctors)
            .unwrap_err();
        assert_eq!(err.message(), "specialization is required");
    }

    #[test]
    fn test_require_route_returns_values_in_table_order() {
        let query = params(&[
            ("clinic", "174"),
            ("region", "204"),
            ("specialization", "9"),
        ]);
        let [region, specialization, clinic] = query.require_route(RouteKind::Doctors).unwrap();

        assert_eq!((region, specialization, clinic), ("204", "9", "174"));
    }

    #[test]
    fn test_require_route_arity_mismatch_is_internal_error() {
        let err = params(&[("region", "204")])
            .require_route::<2>(RouteKind::Specializations)
            .unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_every_route_kind_has_a_table_entry() {
        for kind in [
            RouteKind::Regions,
            RouteKind::Specializations,
            RouteKind::Clinics,
            RouteKind::Doctors,
            RouteKind::Find,
        ] {
            assert_eq!(kind.spec().map(|route| route.kind), Some(kind));
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = params(&[("region", "")]).require("region").unwrap_err();
        assert_eq!(err.message(), "region is required");
    }

    #[test]
    fn test_find_defaults() {
        let search = AppointmentSearch::from_query(&params(&[("region", "WAW")]), today()).unwrap();

        assert_eq!(search.region, "WAW");
        assert_eq!(search.bookingtype, 2);
        assert_eq!(search.specialization, -1);
        assert_eq!(search.clinic, -1);
        assert_eq!(search.doctor, -1);
        assert_eq!(search.start_date, today());
        assert_eq!(search.end_date, None);
        assert_eq!(search.start_time, "0:00");
        assert_eq!(search.end_time, "23:59");
        assert_eq!(search.service, -1);
        assert!(!search.disable_phone_search);
    }

    #[test]
    fn test_find_explicit_values() {
        let search = AppointmentSearch::from_query(
            &params(&[
                ("region", "204"),
                ("specialization", "16234"),
                ("clinic", "174"),
                ("doctor", "42"),
                ("start_date", "2026-11-02"),
            ]),
            today(),
        )
        .unwrap();

        assert_eq!(search.specialization, 16234);
        assert_eq!(search.clinic, 174);
        assert_eq!(search.doctor, 42);
        assert_eq!(search.start_date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
    }

    #[test]
    fn test_find_rejects_bad_date() {
        let err = AppointmentSearch::from_query(
            &params(&[("region", "204"), ("start_date", "02.11.2026")]),
            today(),
        )
        .unwrap_err();

        assert_eq!(err.message(), "start_date must be a date in YYYY-MM-DD format");
    }

    #[test]
    fn test_find_rejects_non_integer_filter() {
        let err = AppointmentSearch::from_query(
            &params(&[("region", "204"), ("doctor", "dr-house")]),
            today(),
        )
        .unwrap_err();

        assert_eq!(err.message(), "doctor must be an integer");
    }

    #[test]
    fn test_search_serializes_date_as_iso() {
        let search = AppointmentSearch::from_query(&params(&[("region", "204")]), today()).unwrap();
        let value = serde_json::to_value(&search).unwrap();

        assert_eq!(value["start_date"], json!("2026-10-18"));
        assert_eq!(value["end_date"], json!(null));
    }

    #[test]
    fn test_route_table_paths_are_unique() {
        let mut paths: Vec<_> = ROUTES.iter().map(|route| route.path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), ROUTES.len());
    }
}

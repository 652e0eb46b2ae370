use axum::http::{header::AUTHORIZATION, HeaderMap};

use shared_models::auth::Credentials;
use shared_models::error::AppError;

use crate::basic_auth::{parse_basic_auth, CredentialError};

/// Reads Basic credentials from the request headers.
pub fn extract_basic_credentials(headers: &HeaderMap) -> Result<Credentials, AppError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| CredentialError::Decode)?),
        None => None,
    };

    Ok(parse_basic_auth(header)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    use crate::test_utils::basic_auth_header;

    #[test]
    fn test_reads_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&basic_auth_header("user", "pass")).unwrap(),
        );

        let credentials = extract_basic_credentials(&headers).unwrap();
        assert_eq!(credentials, Credentials::new("user", "pass"));
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = extract_basic_credentials(&HeaderMap::new()).unwrap_err();

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Missing authorization header");
    }

    #[test]
    fn test_opaque_header_bytes_are_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Basic \xfa\xfb").unwrap());

        let err = extract_basic_credentials(&headers).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}

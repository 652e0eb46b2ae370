use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::Credentials;
use shared_models::error::AppError;

/// Ways a Basic Authorization header can be unusable.
///
/// Messages never include the decoded header contents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing authorization header")]
    Missing,

    #[error("Invalid authentication type")]
    Scheme,

    #[error("Invalid credentials encoding")]
    Decode,

    #[error("Invalid credentials format")]
    Format,
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Auth(err.to_string())
    }
}

/// Parses the raw value of an Authorization header using the Basic scheme.
pub fn parse_basic_auth(header: Option<&str>) -> Result<Credentials, CredentialError> {
    let header = header.ok_or(CredentialError::Missing)?;

    let (scheme, payload) = header.split_once(' ').ok_or(CredentialError::Scheme)?;
    if scheme != "Basic" {
        return Err(CredentialError::Scheme);
    }

    let payload: String = payload
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();

    let decoded = STANDARD.decode(payload.trim()).map_err(|e| {
        debug!("Failed to decode basic credentials: {}", e);
        CredentialError::Decode
    })?;

    let decoded = String::from_utf8(decoded).map_err(|_| CredentialError::Decode)?;
    let decoded = decoded.replace(['\n', '\r'], "");

    let (username, password) = decoded.split_once(':').ok_or(CredentialError::Format)?;

    Ok(Credentials::new(username, password))
}

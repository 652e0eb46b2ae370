use base64::{engine::general_purpose::STANDARD, Engine};

/// Builds a `Basic` Authorization header value for the given pair.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

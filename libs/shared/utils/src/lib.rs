pub mod basic_auth;
pub mod extractor;
pub mod test_utils;

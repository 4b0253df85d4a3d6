pub mod auth;
pub mod match_request;
#[cfg(test)]
mod match_request_test;
pub mod profile;
#[cfg(test)]
mod profile_test;
pub mod user;

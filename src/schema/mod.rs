pub mod auth;
pub mod common;
pub mod match_request;
pub mod profile;
pub mod user;

pub mod match_request;
pub mod profile;
pub mod user;

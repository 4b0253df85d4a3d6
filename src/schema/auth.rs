use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::Deserialize;

use crate::schema::common::{
    BadRequestResponse, ConflictResponse, InternalServerErrorResponse, UnauthorizedResponse,
};

#[derive(Object, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Object, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub is_active: Option<bool>,
}

#[derive(ApiResponse)]
pub enum RegisterResponses {
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct LoginRequest {
    /// email or username
    pub user_name: String,
    pub password: String,
}

#[derive(Object, Deserialize)]
pub struct LoginResponse {
    pub exp: String,
    pub exp_in: i32,
    pub exp_refresh_token: String,
    pub refresh_token: String,
    pub token: String,
    pub token_type: String,
}

#[derive(ApiResponse)]
pub enum LoginResponses {
    #[oai(status = 200)]
    Ok(Json<LoginResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Object, Deserialize)]
pub struct RefreshTokenResponse {
    pub exp: String,
    pub exp_in: i32,
    pub token: String,
    pub token_type: String,
}

#[derive(ApiResponse)]
pub enum RefreshTokenResponses {
    #[oai(status = 200)]
    Ok(Json<RefreshTokenResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(ApiResponse)]
pub enum LogoutResponses {
    #[oai(status = 200)]
    Ok(Json<LogoutResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

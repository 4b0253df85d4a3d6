use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::Deserialize;

use crate::schema::{
    common::{InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse},
    profile::DetailProfile,
};

#[derive(Object, Deserialize)]
pub struct DetailUser {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub is_active: Option<bool>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

#[derive(ApiResponse)]
pub enum UserMeResponses {
    #[oai(status = 200)]
    Ok(Json<DetailUser>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum UserDetailResponses {
    #[oai(status = 200)]
    Ok(Json<DetailUser>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct PotentialMatch {
    pub id: String,
    pub user_name: String,
    pub compatibility_score: f64,
    pub profile: DetailProfile,
}

#[derive(ApiResponse)]
pub enum PotentialMatchesResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<PotentialMatch>>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

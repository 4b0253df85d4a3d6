use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::Deserialize;

use crate::{
    core::utils::{datetime_to_string, datetime_to_string_opt},
    model::match_request::MatchRequest,
    schema::common::{
        BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};

#[derive(Object, Deserialize)]
pub struct MatchCreateRequest {
    pub receiver_id: String,
    pub restaurant_preference: Option<String>,
    /// RFC 3339 timestamp
    pub proposed_date: Option<String>,
}

/// Receiver-only partial update. `status` accepts "accepted" or "rejected".
#[derive(Object, Deserialize)]
pub struct MatchUpdateRequest {
    pub status: Option<String>,
    pub restaurant_preference: Option<String>,
    /// RFC 3339 timestamp
    pub proposed_date: Option<String>,
}

#[derive(Object, Deserialize)]
pub struct DetailMatchRequest {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: String,
    pub restaurant_preference: Option<String>,
    pub proposed_date: Option<String>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

impl DetailMatchRequest {
    pub fn from_model(match_request: &MatchRequest) -> Self {
        Self {
            id: match_request.id.to_string(),
            sender_id: match_request.sender_id.to_string(),
            receiver_id: match_request.receiver_id.to_string(),
            status: match_request.status.as_str().to_string(),
            restaurant_preference: match_request.restaurant_preference.clone(),
            proposed_date: match_request.proposed_date.map(datetime_to_string),
            created_date: datetime_to_string_opt(match_request.created_date),
            updated_date: datetime_to_string_opt(match_request.updated_date),
        }
    }
}

#[derive(ApiResponse)]
pub enum MatchCreateResponses {
    #[oai(status = 201)]
    Created(Json<DetailMatchRequest>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum MatchListResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<DetailMatchRequest>>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum MatchUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<DetailMatchRequest>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ForbiddenResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

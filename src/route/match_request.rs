use std::sync::Arc;

use chrono::Local;
use poem::web::Data;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};
use uuid::Uuid;

use crate::{
    core::{
        security::{get_user_from_token, BearerAuthorization},
        utils::parse_datetime,
    },
    model::match_request::{MatchRequest, MatchStatus},
    repository::{
        match_request::{
            create_match_request, get_match_request_by_id, get_pending_match_request,
            get_received_match_requests, get_sent_match_requests, update_match_request,
        },
        user::get_user_by_id,
    },
    schema::{
        common::{
            BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
            NotFoundResponse, UnauthorizedResponse,
        },
        match_request::{
            DetailMatchRequest, MatchCreateRequest, MatchCreateResponses, MatchListResponses,
            MatchUpdateRequest, MatchUpdateResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiMatchTags {
    Match,
}

pub struct ApiMatch;

#[OpenApi]
impl ApiMatch {
    #[oai(path = "/match", method = "post", tag = "ApiMatchTags::Match")]
    async fn create_match_api(
        &self,
        json: Json<MatchCreateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> MatchCreateResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return MatchCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "create_match_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return MatchCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "create_match_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token
        let request_user =
            match get_user_from_token(&mut tx, &mut redis_conn, auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return MatchCreateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.match_request",
                            "create_match_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => {
                return MatchCreateResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        let receiver_id = match Uuid::parse_str(&json.receiver_id) {
            Ok(val) => val,
            Err(_) => {
                return MatchCreateResponses::NotFound(Json(NotFoundResponse {
                    message: format!("user with id = {} not found", json.receiver_id),
                }))
            }
        };
        if receiver_id == request_user.id {
            return MatchCreateResponses::BadRequest(Json(BadRequestResponse {
                message: "Cannot send a match request to yourself".to_string(),
            }));
        }

        let proposed_date = match &json.proposed_date {
            Some(raw) => match parse_datetime(raw) {
                Some(val) => Some(val),
                None => {
                    return MatchCreateResponses::BadRequest(Json(BadRequestResponse {
                        message: "proposed_date must be an RFC 3339 timestamp".to_string(),
                    }))
                }
            },
            None => None,
        };

        let receiver = match get_user_by_id(&mut tx, &receiver_id).await {
            Ok(val) => val,
            Err(err) => {
                return MatchCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "create_match_api",
                        "get_user_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if receiver.is_none() {
            return MatchCreateResponses::NotFound(Json(NotFoundResponse {
                message: format!("user with id = {} not found", receiver_id),
            }));
        }

        let pending = match get_pending_match_request(&mut tx, &request_user.id, &receiver_id).await
        {
            Ok(val) => val,
            Err(err) => {
                return MatchCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "create_match_api",
                        "get_pending_match_request",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if pending.is_some() {
            return MatchCreateResponses::Conflict(Json(ConflictResponse {
                message: "A pending match request to this user already exists".to_string(),
            }));
        }

        let now = Local::now().fixed_offset();
        let match_request = MatchRequest {
            id: Uuid::now_v7(),
            sender_id: request_user.id,
            receiver_id,
            status: MatchStatus::Pending,
            restaurant_preference: json.restaurant_preference.clone(),
            proposed_date,
            created_date: Some(now),
            updated_date: Some(now),
        };
        if let Err(err) = create_match_request(&mut tx, &match_request).await {
            // the partial unique index rejects a concurrent duplicate pending pair
            if err.to_string().contains("match_request_pending_pair") {
                return MatchCreateResponses::Conflict(Json(ConflictResponse {
                    message: "A pending match request to this user already exists".to_string(),
                }));
            }
            return MatchCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.match_request",
                    "create_match_api",
                    "create_match_request",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return MatchCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.match_request",
                    "create_match_api",
                    "commit transaction",
                    &err.to_string(),
                ),
            ));
        }

        MatchCreateResponses::Created(Json(DetailMatchRequest::from_model(&match_request)))
    }

    #[oai(path = "/match/sent", method = "get", tag = "ApiMatchTags::Match")]
    async fn get_sent_matches_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> MatchListResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return MatchListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "get_sent_matches_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return MatchListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "get_sent_matches_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token
        let request_user =
            match get_user_from_token(&mut tx, &mut redis_conn, auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return MatchListResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.match_request",
                            "get_sent_matches_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => return MatchListResponses::Unauthorized(Json(UnauthorizedResponse::default())),
        };

        let match_requests = match get_sent_match_requests(&mut tx, &request_user.id).await {
            Ok(val) => val,
            Err(err) => {
                return MatchListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "get_sent_matches_api",
                        "get_sent_match_requests",
                        &err.to_string(),
                    ),
                ))
            }
        };
        MatchListResponses::Ok(Json(
            match_requests
                .iter()
                .map(DetailMatchRequest::from_model)
                .collect(),
        ))
    }

    #[oai(path = "/match/received", method = "get", tag = "ApiMatchTags::Match")]
    async fn get_received_matches_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> MatchListResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return MatchListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "get_received_matches_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return MatchListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "get_received_matches_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token
        let request_user =
            match get_user_from_token(&mut tx, &mut redis_conn, auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return MatchListResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.match_request",
                            "get_received_matches_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => return MatchListResponses::Unauthorized(Json(UnauthorizedResponse::default())),
        };

        let match_requests = match get_received_match_requests(&mut tx, &request_user.id).await {
            Ok(val) => val,
            Err(err) => {
                return MatchListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "get_received_matches_api",
                        "get_received_match_requests",
                        &err.to_string(),
                    ),
                ))
            }
        };
        MatchListResponses::Ok(Json(
            match_requests
                .iter()
                .map(DetailMatchRequest::from_model)
                .collect(),
        ))
    }

    #[oai(path = "/match", method = "put", tag = "ApiMatchTags::Match")]
    async fn update_match_api(
        &self,
        Query(id): Query<String>,
        json: Json<MatchUpdateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> MatchUpdateResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return MatchUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "update_match_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return MatchUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "update_match_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token
        let request_user =
            match get_user_from_token(&mut tx, &mut redis_conn, auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return MatchUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.match_request",
                            "update_match_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => {
                return MatchUpdateResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        let match_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => {
                return MatchUpdateResponses::NotFound(Json(NotFoundResponse {
                    message: format!("match with id = {} not found", id),
                }))
            }
        };
        let match_request = match get_match_request_by_id(&mut tx, &match_id).await {
            Ok(val) => val,
            Err(err) => {
                return MatchUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.match_request",
                        "update_match_api",
                        "get_match_request_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let mut match_request = match match_request {
            Some(val) => val,
            None => {
                return MatchUpdateResponses::NotFound(Json(NotFoundResponse {
                    message: format!("match with id = {} not found", match_id),
                }))
            }
        };

        // only the receiver may respond
        if match_request.receiver_id != request_user.id {
            return MatchUpdateResponses::Forbidden(Json(ForbiddenResponse::default()));
        }
        // resolved matches are immutable
        if match_request.status != MatchStatus::Pending {
            return MatchUpdateResponses::Conflict(Json(ConflictResponse {
                message: format!(
                    "match is already {}",
                    match_request.status.as_str()
                ),
            }));
        }

        if let Some(raw) = &json.status {
            let status = match MatchStatus::parse(raw) {
                Some(MatchStatus::Pending) | None => {
                    return MatchUpdateResponses::BadRequest(Json(BadRequestResponse {
                        message: "status must be accepted or rejected".to_string(),
                    }))
                }
                Some(val) => val,
            };
            match_request.status = status;
        }
        if let Some(val) = &json.restaurant_preference {
            match_request.restaurant_preference = Some(val.clone());
        }
        if let Some(raw) = &json.proposed_date {
            match parse_datetime(raw) {
                Some(val) => match_request.proposed_date = Some(val),
                None => {
                    return MatchUpdateResponses::BadRequest(Json(BadRequestResponse {
                        message: "proposed_date must be an RFC 3339 timestamp".to_string(),
                    }))
                }
            }
        }

        let now = Local::now().fixed_offset();
        if let Err(err) = update_match_request(&mut tx, &mut match_request, &now).await {
            return MatchUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.match_request",
                    "update_match_api",
                    "update_match_request",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return MatchUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.match_request",
                    "update_match_api",
                    "commit transaction",
                    &err.to_string(),
                ),
            ));
        }

        MatchUpdateResponses::Ok(Json(DetailMatchRequest::from_model(&match_request)))
    }
}

use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};
use uuid::Uuid;

use crate::{
    core::{
        security::{get_user_from_token, BearerAuthorization},
        utils::datetime_to_string_opt,
    },
    matching::rank::rank_candidates,
    repository::user::get_user_by_id,
    schema::{
        common::{InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse},
        profile::DetailProfile,
        user::{
            DetailUser, PotentialMatch, PotentialMatchesResponses, UserDetailResponses,
            UserMeResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiUserTags {
    User,
}

pub struct ApiUser;

#[OpenApi]
impl ApiUser {
    #[oai(path = "/user/me", method = "get", tag = "ApiUserTags::User")]
    async fn get_me_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> UserMeResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return UserMeResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_me_api",
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
                return UserMeResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_me_api",
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
                    return UserMeResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.user",
                            "get_me_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => return UserMeResponses::Unauthorized(Json(UnauthorizedResponse::default())),
        };

        UserMeResponses::Ok(Json(DetailUser {
            id: request_user.id.to_string(),
            email: request_user.email,
            user_name: request_user.user_name,
            is_active: request_user.is_active,
            created_date: datetime_to_string_opt(request_user.created_date),
            updated_date: datetime_to_string_opt(request_user.updated_date),
        }))
    }

    #[oai(path = "/user/detail", method = "get", tag = "ApiUserTags::User")]
    async fn get_detail_user_api(
        &self,
        Query(id): Query<String>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> UserDetailResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return UserDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_detail_user_api",
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
                return UserDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_detail_user_api",
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
                    return UserDetailResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.user",
                            "get_detail_user_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        if request_user.is_none() {
            return UserDetailResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        }

        let id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => {
                return UserDetailResponses::NotFound(Json(NotFoundResponse {
                    message: format!("user with id = {} not found", id),
                }))
            }
        };

        let user = match get_user_by_id(&mut tx, &id).await {
            Ok(val) => val,
            Err(err) => {
                return UserDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_detail_user_api",
                        "get_user_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let user = match user {
            Some(val) => val,
            None => {
                return UserDetailResponses::NotFound(Json(NotFoundResponse {
                    message: format!("user with id = {} not found", id),
                }))
            }
        };

        UserDetailResponses::Ok(Json(DetailUser {
            id: user.id.to_string(),
            email: user.email,
            user_name: user.user_name,
            is_active: user.is_active,
            created_date: datetime_to_string_opt(user.created_date),
            updated_date: datetime_to_string_opt(user.updated_date),
        }))
    }

    #[oai(
        path = "/user/potential-matches",
        method = "get",
        tag = "ApiUserTags::User"
    )]
    async fn get_potential_matches_api(
        &self,
        Query(skip): Query<Option<u32>>,
        Query(limit): Query<Option<u32>>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> PotentialMatchesResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return PotentialMatchesResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_potential_matches_api",
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
                return PotentialMatchesResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_potential_matches_api",
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
                    return PotentialMatchesResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.user",
                            "get_potential_matches_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => {
                return PotentialMatchesResponses::Unauthorized(Json(
                    UnauthorizedResponse::default(),
                ))
            }
        };

        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(10);
        let ranked = match rank_candidates(&mut tx, &request_user, skip, limit).await {
            Ok(val) => val,
            Err(err) => {
                return PotentialMatchesResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_potential_matches_api",
                        "rank_candidates",
                        &err.to_string(),
                    ),
                ))
            }
        };

        let results: Vec<PotentialMatch> = ranked
            .iter()
            .map(|item| PotentialMatch {
                id: item.user.id.to_string(),
                user_name: item.user.user_name.clone(),
                compatibility_score: item.score,
                profile: DetailProfile::from_model(&item.profile),
            })
            .collect();
        PotentialMatchesResponses::Ok(Json(results))
    }
}

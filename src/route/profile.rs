use std::sync::Arc;

use chrono::Local;
use poem::web::Data;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};
use sqlx::types::Json as SqlxJson;
use uuid::Uuid;

use crate::{
    core::security::{get_user_from_token, BearerAuthorization},
    model::profile::{Profile, VerificationStatus},
    repository::profile::{create_profile, get_profile_by_user_id, update_profile},
    schema::{
        common::{
            ConflictResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
        },
        profile::{
            DetailProfile, ProfileCreateRequest, ProfileCreateResponses, ProfileDetailResponses,
            ProfileUpdateRequest, ProfileUpdateResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiProfileTags {
    Profile,
}

pub struct ApiProfile;

#[OpenApi]
impl ApiProfile {
    #[oai(path = "/profile", method = "post", tag = "ApiProfileTags::Profile")]
    async fn create_profile_api(
        &self,
        json: Json<ProfileCreateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileCreateResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return ProfileCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "create_profile_api",
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
                return ProfileCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "create_profile_api",
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
                    return ProfileCreateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "create_profile_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => {
                return ProfileCreateResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        // one profile per user
        let existing = match get_profile_by_user_id(&mut tx, &request_user.id).await {
            Ok(val) => val,
            Err(err) => {
                return ProfileCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "create_profile_api",
                        "check existing profile",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if existing.is_some() {
            return ProfileCreateResponses::Conflict(Json(ConflictResponse {
                message: "Profile already exists for this user".to_string(),
            }));
        }

        let now = Local::now().fixed_offset();
        let profile = Profile {
            id: Uuid::now_v7(),
            user_id: request_user.id,
            full_name: json.full_name.clone(),
            bio: json.bio.clone(),
            cuisine_preferences: json.cuisine_preferences.clone(),
            dietary_restrictions: json.dietary_restrictions.clone(),
            location: json.location.clone(),
            avatar_url: json.avatar_url.clone(),
            profile_photos: SqlxJson(json.profile_photos.clone().unwrap_or_default()),
            verification_status: VerificationStatus::Unverified,
            verification_date: None,
            cooking_level: json.cooking_level.clone(),
            preferred_dining_time: json.preferred_dining_time.clone(),
            preferred_meal_types: json.preferred_meal_types.clone(),
            preferred_group_size: json.preferred_group_size,
            food_allergies: json.food_allergies.clone(),
            special_diets: json.special_diets.clone(),
            favorite_cuisines: SqlxJson(json.favorite_cuisines.clone().unwrap_or_default()),
            price_range: json.price_range.clone(),
            created_date: Some(now),
            updated_date: Some(now),
        };
        if let Err(err) = create_profile(&mut tx, &profile).await {
            return ProfileCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "create_profile_api",
                    "create_profile",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return ProfileCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "create_profile_api",
                    "commit transaction",
                    &err.to_string(),
                ),
            ));
        }

        ProfileCreateResponses::Created(Json(DetailProfile::from_model(&profile)))
    }

    #[oai(path = "/profile/me", method = "get", tag = "ApiProfileTags::Profile")]
    async fn get_my_profile_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileDetailResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return ProfileDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "get_my_profile_api",
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
                return ProfileDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "get_my_profile_api",
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
                    return ProfileDetailResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "get_my_profile_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => {
                return ProfileDetailResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        let profile = match get_profile_by_user_id(&mut tx, &request_user.id).await {
            Ok(val) => val,
            Err(err) => {
                return ProfileDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "get_my_profile_api",
                        "get_profile_by_user_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        match profile {
            Some(val) => ProfileDetailResponses::Ok(Json(DetailProfile::from_model(&val))),
            None => ProfileDetailResponses::NotFound(Json(NotFoundResponse {
                message: "Profile not found".to_string(),
            })),
        }
    }

    #[oai(path = "/profile/me", method = "put", tag = "ApiProfileTags::Profile")]
    async fn update_my_profile_api(
        &self,
        json: Json<ProfileUpdateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileUpdateResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return ProfileUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "update_my_profile_api",
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
                return ProfileUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "update_my_profile_api",
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
                    return ProfileUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "update_my_profile_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let request_user = match request_user {
            Some(val) => val,
            None => {
                return ProfileUpdateResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        let profile = match get_profile_by_user_id(&mut tx, &request_user.id).await {
            Ok(val) => val,
            Err(err) => {
                return ProfileUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "update_my_profile_api",
                        "get_profile_by_user_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let mut profile = match profile {
            Some(val) => val,
            None => {
                return ProfileUpdateResponses::NotFound(Json(NotFoundResponse {
                    message: "Profile not found".to_string(),
                }))
            }
        };

        // merge supplied fields only
        if let Some(val) = &json.full_name {
            profile.full_name = Some(val.clone());
        }
        if let Some(val) = &json.bio {
            profile.bio = Some(val.clone());
        }
        if let Some(val) = &json.cuisine_preferences {
            profile.cuisine_preferences = Some(val.clone());
        }
        if let Some(val) = &json.dietary_restrictions {
            profile.dietary_restrictions = Some(val.clone());
        }
        if let Some(val) = &json.location {
            profile.location = Some(val.clone());
        }
        if let Some(val) = &json.avatar_url {
            profile.avatar_url = Some(val.clone());
        }
        if let Some(val) = &json.profile_photos {
            profile.profile_photos = SqlxJson(val.clone());
        }
        if let Some(val) = &json.cooking_level {
            profile.cooking_level = Some(val.clone());
        }
        if let Some(val) = &json.preferred_dining_time {
            profile.preferred_dining_time = Some(val.clone());
        }
        if let Some(val) = &json.preferred_meal_types {
            profile.preferred_meal_types = Some(val.clone());
        }
        if let Some(val) = json.preferred_group_size {
            profile.preferred_group_size = Some(val);
        }
        if let Some(val) = &json.food_allergies {
            profile.food_allergies = Some(val.clone());
        }
        if let Some(val) = &json.special_diets {
            profile.special_diets = Some(val.clone());
        }
        if let Some(val) = &json.favorite_cuisines {
            profile.favorite_cuisines = SqlxJson(val.clone());
        }
        if let Some(val) = &json.price_range {
            profile.price_range = Some(val.clone());
        }

        let now = Local::now().fixed_offset();
        if let Err(err) = update_profile(&mut tx, &mut profile, &now).await {
            return ProfileUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "update_my_profile_api",
                    "update_profile",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return ProfileUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "update_my_profile_api",
                    "commit transaction",
                    &err.to_string(),
                ),
            ));
        }

        ProfileUpdateResponses::Ok(Json(DetailProfile::from_model(&profile)))
    }

    #[oai(
        path = "/profile/detail",
        method = "get",
        tag = "ApiProfileTags::Profile"
    )]
    async fn get_detail_profile_api(
        &self,
        Query(user_id): Query<String>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileDetailResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return ProfileDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "get_detail_profile_api",
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
                return ProfileDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "get_detail_profile_api",
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
                    return ProfileDetailResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "get_detail_profile_api",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        if request_user.is_none() {
            return ProfileDetailResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        }

        let user_id = match Uuid::parse_str(&user_id) {
            Ok(val) => val,
            Err(_) => {
                return ProfileDetailResponses::NotFound(Json(NotFoundResponse {
                    message: format!("profile for user_id = {} not found", user_id),
                }))
            }
        };

        let profile = match get_profile_by_user_id(&mut tx, &user_id).await {
            Ok(val) => val,
            Err(err) => {
                return ProfileDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "get_detail_profile_api",
                        "get_profile_by_user_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        match profile {
            Some(val) => ProfileDetailResponses::Ok(Json(DetailProfile::from_model(&val))),
            None => ProfileDetailResponses::NotFound(Json(NotFoundResponse {
                message: format!("profile for user_id = {} not found", user_id),
            })),
        }
    }
}

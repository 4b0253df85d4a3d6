use std::sync::Arc;

use chrono::{Duration, Local};
use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};
use uuid::Uuid;

use crate::{
    core::{
        security::{
            generate_refresh_token_from_user, generate_token_from_user,
            get_user_from_refresh_token, get_user_from_token, hash_password, verify_hash_password,
            BearerAuthorization,
        },
        session::{add_session, remove_session},
        utils::datetime_to_string,
    },
    model::user::User,
    repository::user::{create_user, get_user_by_email, get_user_by_login, get_user_by_username},
    schema::{
        auth::{
            LoginRequest, LoginResponse, LoginResponses, LogoutResponse, LogoutResponses,
            RefreshTokenRequest, RefreshTokenResponse, RefreshTokenResponses, RegisterRequest,
            RegisterResponse, RegisterResponses,
        },
        common::{
            BadRequestResponse, ConflictResponse, InternalServerErrorResponse,
            UnauthorizedResponse,
        },
    },
    settings::get_config,
    AppState,
};

#[derive(Tags)]
enum ApiAuthTags {
    Auth,
}

pub struct ApiAuth;

#[OpenApi]
impl ApiAuth {
    #[oai(path = "/auth/register", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_register(
        &self,
        json: Json<RegisterRequest>,
        state: Data<&Arc<AppState>>,
    ) -> RegisterResponses {
        if json.email.trim().is_empty()
            || json.user_name.trim().is_empty()
            || json.password.is_empty()
        {
            return RegisterResponses::BadRequest(Json(BadRequestResponse {
                message: "email, user_name and password are required".to_string(),
            }));
        }

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return RegisterResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_register",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // email must be unique
        let existing = match get_user_by_email(&mut tx, &json.email).await {
            Ok(val) => val,
            Err(err) => {
                return RegisterResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_register",
                        "check email on database",
                        &err.to_string(),
                    ),
                ));
            }
        };
        if existing.is_some() {
            return RegisterResponses::Conflict(Json(ConflictResponse {
                message: "User with this email already exists".to_string(),
            }));
        }

        // username must be unique
        let existing = match get_user_by_username(&mut tx, &json.user_name).await {
            Ok(val) => val,
            Err(err) => {
                return RegisterResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_register",
                        "check username on database",
                        &err.to_string(),
                    ),
                ));
            }
        };
        if existing.is_some() {
            return RegisterResponses::Conflict(Json(ConflictResponse {
                message: "User with this username already exists".to_string(),
            }));
        }

        let hashed_password = match hash_password(&json.password) {
            Ok(val) => val,
            Err(err) => {
                return RegisterResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_register",
                        "hash password",
                        &err.to_string(),
                    ),
                ));
            }
        };

        let now = Local::now().fixed_offset();
        let user = User {
            id: Uuid::now_v7(),
            email: json.email.trim().to_string(),
            user_name: json.user_name.trim().to_string(),
            password: hashed_password,
            is_active: Some(true),
            created_date: Some(now),
            updated_date: Some(now),
        };
        if let Err(err) = create_user(&mut tx, &user).await {
            return RegisterResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_register",
                    "create_user",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return RegisterResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_register",
                    "commit transaction",
                    &err.to_string(),
                ),
            ));
        }

        RegisterResponses::Created(Json(RegisterResponse {
            id: user.id.to_string(),
            email: user.email,
            user_name: user.user_name,
            is_active: user.is_active,
        }))
    }

    #[oai(path = "/auth/login", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_login(
        &self,
        json: Json<LoginRequest>,
        state: Data<&Arc<AppState>>,
    ) -> LoginResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_login",
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
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "get redis pool connection",
                    &err.to_string(),
                )))
            }
        };

        // find user by email or username
        let user = match get_user_by_login(&mut tx, &json.user_name).await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "check user on database",
                    &err.to_string(),
                )));
            }
        };
        let user = match user {
            Some(val) => val,
            None => {
                return LoginResponses::BadRequest(Json(BadRequestResponse {
                    message: "Invalid credentials".to_string(),
                }))
            }
        };

        // validate user password
        let is_valid = match verify_hash_password(&json.password, &user.password) {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "validate user password",
                    &err.to_string(),
                )))
            }
        };
        if !is_valid {
            return LoginResponses::BadRequest(Json(BadRequestResponse {
                message: "Invalid credentials".to_string(),
            }));
        }

        let config = get_config();
        let token = match generate_token_from_user(user.clone(), config.clone()).await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "generate token",
                    &err.to_string(),
                )))
            }
        };

        let refresh_token = match generate_refresh_token_from_user(user.clone(), config.clone())
            .await
        {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "generate refresh token",
                    &err.to_string(),
                )))
            }
        };

        if let Err(err) = add_session(
            &mut redis_conn,
            &user,
            &config,
            token.clone(),
            refresh_token.clone(),
        ) {
            return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.auth",
                "auth_login",
                "add_session to redis",
                &err.to_string(),
            )));
        }
        let now = Local::now();
        let exp = now + Duration::minutes(config.jwt_exp as i64);
        let exp_refresh_token = now + Duration::minutes(config.jwt_refresh_exp as i64);
        LoginResponses::Ok(Json(LoginResponse {
            exp: datetime_to_string(exp.fixed_offset()),
            exp_in: now.timestamp() as i32 + config.jwt_exp as i32,
            exp_refresh_token: datetime_to_string(exp_refresh_token.fixed_offset()),
            refresh_token,
            token,
            token_type: "Bearer".to_string(),
        }))
    }

    #[oai(
        path = "/auth/refresh-token",
        method = "post",
        tag = "ApiAuthTags::Auth"
    )]
    async fn auth_refresh_token(
        &self,
        json: Json<RefreshTokenRequest>,
        state: Data<&Arc<AppState>>,
    ) -> RefreshTokenResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return RefreshTokenResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_refresh_token",
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
                return RefreshTokenResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_refresh_token",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        let config = get_config();
        let refresh_token_user = match get_user_from_refresh_token(
            &mut tx,
            Some(json.refresh_token.clone()),
            config.clone(),
        )
        .await
        {
            Ok(val) => val,
            Err(_) => {
                return RefreshTokenResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };
        let user = match refresh_token_user {
            Some(val) => val,
            None => {
                return RefreshTokenResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        let token = match generate_token_from_user(user.clone(), config.clone()).await {
            Ok(val) => val,
            Err(err) => {
                return RefreshTokenResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_refresh_token",
                        "generate token",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if let Err(err) = add_session(
            &mut redis_conn,
            &user,
            &config,
            token.clone(),
            json.refresh_token.clone(),
        ) {
            return RefreshTokenResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_refresh_token",
                    "add_session to redis",
                    &err.to_string(),
                ),
            ));
        }

        let now = Local::now();
        let exp = now + Duration::minutes(config.jwt_exp as i64);
        RefreshTokenResponses::Ok(Json(RefreshTokenResponse {
            exp: datetime_to_string(exp.fixed_offset()),
            exp_in: now.timestamp() as i32 + config.jwt_exp as i32,
            token,
            token_type: "Bearer".to_string(),
        }))
    }

    #[oai(path = "/auth/logout", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_logout(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> LogoutResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
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
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token
        let jwt_token = auth.0.token;
        let request_user =
            match get_user_from_token(&mut tx, &mut redis_conn, jwt_token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return LogoutResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.auth",
                            "auth_logout",
                            "get user from token",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        if request_user.is_none() {
            return LogoutResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        }

        let token = jwt_token.unwrap_or_default();
        if let Err(err) = remove_session(&mut redis_conn, token) {
            return LogoutResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.auth",
                "auth_logout",
                "remove_session from redis",
                &err.to_string(),
            )));
        }

        LogoutResponses::Ok(Json(LogoutResponse {
            message: "Logged out".to_string(),
        }))
    }
}
